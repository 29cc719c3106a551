//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use canva_proxy::config::ProxyConfig;
use canva_proxy::http::HttpServer;
use canva_proxy::lifecycle::Shutdown;
use serde_json::Value;
use tokio::net::TcpListener;

/// A running proxy bound to an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default config forwarding to `origin`.
pub fn config_for(origin: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.backend.base_url = Some(origin.to_string());
    config
}

/// Start the proxy with `config`. The listener is bound before this returns.
pub async fn spawn_proxy(config: ProxyConfig) -> TestProxy {
    let server = HttpServer::new(config).expect("server state");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

/// Client that follows no redirects, uses no system proxies and leaves
/// content encoding alone.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .no_gzip()
        .no_brotli()
        .no_deflate()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// An origin URL nothing is listening on.
pub async fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Three-segment token with an unsigned payload.
pub fn unsigned_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
