//! Cross-origin policy for browser clients.
//!
//! Origins are matched exactly (case-insensitive) or against a pattern with a
//! single `*` standing for a non-empty run of characters, so
//! `https://*.github.dev` admits Codespaces port-forward hosts.

use std::sync::Arc;
use std::time::Duration;

use http::{request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Methods accepted from cross-origin callers
pub const CORS_ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    Wildcard { prefix: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.split_once('*') {
            Some((prefix, suffix)) => OriginPattern::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
            None => OriginPattern::Exact(pattern),
        }
    }

    /// `origin` must already be lowercase.
    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Exact(exact) => origin == exact,
            OriginPattern::Wildcard { prefix, suffix } => {
                origin.len() > prefix.len() + suffix.len()
                    && origin.starts_with(prefix.as_str())
                    && origin.ends_with(suffix.as_str())
            }
        }
    }
}

/// Set of origins allowed to make credentialed cross-origin requests.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    patterns: Vec<OriginPattern>,
}

impl AllowedOrigins {
    pub fn new<S: AsRef<str>>(origins: &[S]) -> Self {
        Self {
            patterns: origins
                .iter()
                .map(|o| OriginPattern::parse(o.as_ref()))
                .collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        let origin = origin.to_ascii_lowercase();
        self.patterns.iter().any(|p| p.matches(&origin))
    }
}

/// Build the CORS layer for the configured origins.
///
/// Request headers are mirrored rather than answered with `*`, since a
/// wildcard is not honored by browsers once credentials are allowed.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed = Arc::new(AllowedOrigins::new(&config.allowed_origins));

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| allowed.allows(origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods(CORS_ALLOWED_METHODS.to_vec())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
