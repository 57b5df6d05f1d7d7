//! Cross-origin policy.
//!
//! # Design Decisions
//! - Allow-list: `Access-Control-Allow-Origin` echoes the request origin only
//!   when it is listed; a `"*"` entry turns the list into a wildcard
//! - Unlisted origins still get a response, just without the allow header
//! - Every `OPTIONS` request is answered here as a preflight and never
//!   reaches the gateway handler

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer for the configured allow-list.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(&config.allowed_origins))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::list(
            config
                .allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok()),
        ))
        .max_age(Duration::from_secs(config.max_age_secs))
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }
    AllowOrigin::list(
        origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok()),
    )
}
