//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered route table
//! - Look up the first route matching a request
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Exact routes precede wildcards; first match wins
//! - Explicit NoMatch rather than silent default

use axum::body::Body;
use axum::http::{Method, Request};

use crate::config::ProxySettings;
use crate::proxy::{ForwardMode, ForwardTarget};
use crate::routing::matcher::{AndMatcher, ExactPathMatcher, Matcher, MethodMatcher, PathPrefixMatcher};

/// How an origin response is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Status, headers and body bytes.
    Full,
    /// Status and the `content` field of the origin's JSON body.
    ContentField,
}

/// What to do with a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Decode the identity token from the provider callback.
    AuthCallback,
    /// Redirect to the provider authorization page.
    AuthAuthorize,
    /// Redirect to the origin's own authorization endpoint.
    OAuthRedirect,
    /// Relay through the forwarding engine.
    Forward { target: ForwardTarget, relay: RelayMode },
}

/// One entry of the route table.
#[derive(Debug)]
pub struct Route {
    /// Route identifier for logging/metrics.
    pub name: &'static str,
    pub action: RouteAction,
    matcher: Box<dyn Matcher>,
}

impl Route {
    pub fn new(name: &'static str, matcher: Box<dyn Matcher>, action: RouteAction) -> Self {
        Self { name, action, matcher }
    }

    /// Method + exact path rule.
    pub fn exact(name: &'static str, method: Method, path: &str, action: RouteAction) -> Self {
        Self::new(
            name,
            Box::new(AndMatcher::new(vec![
                Box::new(MethodMatcher::new(method)),
                Box::new(ExactPathMatcher::new(path)),
            ])),
            action,
        )
    }

    /// Method + any path rule.
    pub fn wildcard(name: &'static str, method: Method, action: RouteAction) -> Self {
        Self::new(
            name,
            Box::new(AndMatcher::new(vec![
                Box::new(MethodMatcher::new(method)),
                Box::new(PathPrefixMatcher::any()),
            ])),
            action,
        )
    }

    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }
}

/// Ordered route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The proxy's route table.
    pub fn standard(settings: &ProxySettings) -> Self {
        let (wildcard_get_target, wildcard_get_relay) = if settings.unwrap_content_envelope {
            (ForwardTarget::passthrough_query().decoded(), RelayMode::ContentField)
        } else {
            (ForwardTarget::passthrough_query(), RelayMode::Full)
        };

        Self::new(vec![
            Route::exact("auth_callback", Method::GET, "/auth/callback", RouteAction::AuthCallback),
            Route::exact("auth_authorize", Method::GET, "/auth/authorize", RouteAction::AuthAuthorize),
            Route::exact(
                "oauth2_authorize",
                Method::GET,
                "/api/oauth2/authorize",
                RouteAction::OAuthRedirect,
            ),
            Route::exact(
                "proxy_request_post",
                Method::POST,
                "/api/proxy-request",
                RouteAction::Forward {
                    target: ForwardTarget {
                        mode: ForwardMode::BodyPreserving,
                        path: Some("/proxy-request"),
                        preserve_query: false,
                        decode: false,
                    },
                    relay: RelayMode::Full,
                },
            ),
            Route::exact(
                "proxy_request_get",
                Method::GET,
                "/api/proxy-request",
                RouteAction::Forward {
                    target: ForwardTarget {
                        mode: ForwardMode::QueryPreserving,
                        path: Some("/proxy-request"),
                        preserve_query: true,
                        decode: false,
                    },
                    relay: RelayMode::Full,
                },
            ),
            Route::wildcard(
                "wildcard_post",
                Method::POST,
                RouteAction::Forward {
                    target: ForwardTarget::passthrough_body(),
                    relay: RelayMode::Full,
                },
            ),
            Route::wildcard(
                "wildcard_get",
                Method::GET,
                RouteAction::Forward {
                    target: wildcard_get_target,
                    relay: wildcard_get_relay,
                },
            ),
        ])
    }

    /// Find the first route matching the request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(req))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::default())
            .unwrap()
    }

    fn route_name(router: &Router, method: Method, uri: &str) -> Option<&'static str> {
        router.match_request(&request(method, uri)).map(|r| r.name)
    }

    #[test]
    fn test_exact_routes_win() {
        let router = Router::standard(&ProxySettings::default());
        assert_eq!(route_name(&router, Method::GET, "/auth/callback?canva_user_token=x"), Some("auth_callback"));
        assert_eq!(route_name(&router, Method::GET, "/auth/authorize"), Some("auth_authorize"));
        assert_eq!(route_name(&router, Method::GET, "/api/oauth2/authorize?a=1"), Some("oauth2_authorize"));
        assert_eq!(route_name(&router, Method::POST, "/api/proxy-request"), Some("proxy_request_post"));
        assert_eq!(route_name(&router, Method::GET, "/api/proxy-request"), Some("proxy_request_get"));
    }

    #[test]
    fn test_wildcards() {
        let router = Router::standard(&ProxySettings::default());
        assert_eq!(route_name(&router, Method::POST, "/auth/callback"), Some("wildcard_post"));
        assert_eq!(route_name(&router, Method::POST, "/"), Some("wildcard_post"));
        assert_eq!(route_name(&router, Method::GET, "/webhook"), Some("wildcard_get"));
        assert_eq!(route_name(&router, Method::HEAD, "/webhook"), Some("wildcard_get"));
    }

    #[test]
    fn test_other_methods_unmatched() {
        let router = Router::standard(&ProxySettings::default());
        assert_eq!(route_name(&router, Method::PUT, "/anything"), None);
        assert_eq!(route_name(&router, Method::DELETE, "/api/proxy-request"), None);
    }

    #[test]
    fn test_wildcard_get_relay_mode() {
        let router = Router::standard(&ProxySettings::default());
        let route = router.match_request(&request(Method::GET, "/webhook")).unwrap();
        assert!(matches!(
            route.action,
            RouteAction::Forward { relay: RelayMode::ContentField, target } if target.decode
        ));

        let router = Router::standard(&ProxySettings { unwrap_content_envelope: false });
        let route = router.match_request(&request(Method::GET, "/webhook")).unwrap();
        assert!(matches!(
            route.action,
            RouteAction::Forward { relay: RelayMode::Full, target } if !target.decode
        ));
    }

    #[test]
    fn test_only_content_field_route_decodes() {
        let router = Router::standard(&ProxySettings::default());
        for route in router.routes() {
            if let RouteAction::Forward { target, relay } = route.action {
                assert_eq!(target.decode, relay == RelayMode::ContentField, "route {}", route.name);
            }
        }
    }
}
