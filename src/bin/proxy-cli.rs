use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use canva_proxy::auth::{build_auth_url, verifier_from_config, AuthorizationParams, Pkce, TokenInspector};
use canva_proxy::config::read_config;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Management CLI for the Canva proxy", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; the environment overlays it.
    #[arg(short, long, env = "PROXY_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a user token and print its claims
    DecodeToken {
        token: String,
    },
    /// Print the provider authorization URL for this configuration
    AuthorizeUrl {
        #[arg(long)]
        code_challenge: Option<String>,
        #[arg(long)]
        code_challenge_method: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_deref())?;

    match cli.command {
        Commands::DecodeToken { token } => {
            let inspector = TokenInspector::new(verifier_from_config(&config.token_verification)?);
            if !inspector.is_enforcing() {
                eprintln!("warning: signature not verified");
            }
            let claims = inspector.inspect(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
        Commands::AuthorizeUrl {
            code_challenge,
            code_challenge_method,
            state,
        } => {
            let params = AuthorizationParams::from_config(&config.canva)
                .ok_or("CANVA_CLIENT_ID, CANVA_CLIENT_SECRET and CANVA_REDIRECT_URI must all be set")?
                .with_pkce(code_challenge.map(|c| Pkce::new(c, code_challenge_method)))
                .with_state(state);
            let base = Url::parse(&config.canva.authorize_url)?;
            println!("{}", build_auth_url(&base, &params, &config.canva.scope));
        }
    }

    Ok(())
}
