//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (GET rules also accept HEAD)
//! - Match exact path or path prefix (case-sensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive and ignores the query string
//! - No regex to guarantee O(n) matching

use axum::body::Body;
use axum::http::{Method, Request};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        let method = req.method();
        method == self.method || (self.method == Method::GET && method == Method::HEAD)
    }
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.uri().path() == self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Matches every path.
    pub fn any() -> Self {
        Self::new("/")
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.uri().path().starts_with(&self.prefix)
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().all(|m| m.matches(req))
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

    #[test]
    fn test_method_matcher() {
        let matcher = MethodMatcher::new(Method::GET);
        assert!(matcher.matches(&request(Method::GET, "/")));
        assert!(matcher.matches(&request(Method::HEAD, "/")));
        assert!(!matcher.matches(&request(Method::POST, "/")));

        let matcher = MethodMatcher::new(Method::POST);
        assert!(!matcher.matches(&request(Method::HEAD, "/")));
    }

    #[test]
    fn test_exact_path_matcher() {
        let matcher = ExactPathMatcher::new("/auth/callback");
        assert!(matcher.matches(&request(Method::GET, "/auth/callback?x=1")));
        assert!(!matcher.matches(&request(Method::GET, "/auth/callback/extra")));
        assert!(!matcher.matches(&request(Method::GET, "/AUTH/callback")));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api");

        assert!(matcher.matches(&request(Method::GET, "http://example.com/api/v1")));
        assert!(!matcher.matches(&request(Method::GET, "http://example.com/images")));
        assert!(PathPrefixMatcher::any().matches(&request(Method::GET, "/anything/at/all")));
    }

    #[test]
    fn test_and_matcher() {
        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new(Method::POST)),
            Box::new(ExactPathMatcher::new("/api/proxy-request")),
        ]);
        assert!(matcher.matches(&request(Method::POST, "/api/proxy-request")));
        assert!(!matcher.matches(&request(Method::GET, "/api/proxy-request")));
        assert!(!matcher.matches(&request(Method::POST, "/api/other")));
    }
}
