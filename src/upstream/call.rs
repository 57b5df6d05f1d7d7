//! The outbound call produced by binding.

use std::fmt;

use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::routing::spec::{HttpMethod, Upstream};

/// A fully bound upstream request. Carries credentials, so its `Debug`
/// output omits the query string and header values.
#[derive(Clone, PartialEq)]
pub struct OutboundCall {
    pub upstream: Upstream,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl OutboundCall {
    /// Scheme, host and path only; safe to log.
    pub fn log_target(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for OutboundCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<_> = self.headers.iter().map(|(k, _)| *k).collect();
        f.debug_struct("OutboundCall")
            .field("upstream", &self.upstream)
            .field("method", &self.method)
            .field("target", &self.log_target())
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Base URL for an upstream, without a trailing slash.
pub fn base_url(upstreams: &UpstreamConfig, upstream: Upstream) -> &str {
    let base = match upstream {
        Upstream::Trello => &upstreams.trello_base_url,
        Upstream::Gemini => &upstreams.gemini_base_url,
    };
    base.trim_end_matches('/')
}
