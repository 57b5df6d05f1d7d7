//! Raw-path passthrough to the Trello API.
//!
//! The caller names a path relative to the Trello base URL. The server key is
//! always attached; the caller's bearer token travels next to it as `token`
//! (the server token is used when the caller has none). Anything that could
//! move the request off the upstream host is refused.

use url::Url;

use crate::config::{SecretName, SecretStore, UpstreamConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::InboundRequest;
use crate::routing::binder::append_query;
use crate::routing::spec::{HttpMethod, Upstream};
use crate::upstream::call::{base_url, OutboundCall};

/// Query names the gateway owns on passthrough calls.
const RESERVED_QUERY: [&str; 2] = ["key", "token"];

/// Bind a passthrough request.
pub fn bind_passthrough(
    raw_path: &str,
    inbound: &InboundRequest,
    secrets: &SecretStore,
    upstreams: &UpstreamConfig,
) -> GatewayResult<OutboundCall> {
    let (path, query) = split_relative(raw_path)?;
    let key = secrets
        .get(SecretName::TrelloKey)
        .ok_or(GatewayError::SecretsNotConfigured(SecretName::TrelloKey))?;
    let token = match inbound.bearer_token() {
        Some(token) => token,
        None => secrets
            .get(SecretName::TrelloToken)
            .ok_or(GatewayError::SecretsNotConfigured(SecretName::TrelloToken))?,
    };

    let base = base_url(upstreams, Upstream::Trello);

    let mut url = format!("{}/{}", base, path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    append_query(&mut url, &[("key", key.to_string()), ("token", token.to_string())]);

    ensure_same_host(base, &url)?;

    let body = match inbound.method {
        HttpMethod::Post | HttpMethod::Put => inbound.body.clone(),
        HttpMethod::Get | HttpMethod::Delete => None,
    };

    Ok(OutboundCall {
        upstream: Upstream::Trello,
        method: inbound.method,
        url,
        headers: Vec::new(),
        body,
    })
}

/// Validate a caller path and split off its query. Returns the path without
/// its leading slash.
fn split_relative(raw: &str) -> GatewayResult<(&str, Option<&str>)> {
    if raw.chars().any(|c| c.is_control() || c.is_whitespace() || c == '\\' || c == '#') {
        return Err(GatewayError::UnsupportedPath);
    }

    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };

    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() || path.starts_with('/') {
        return Err(GatewayError::UnsupportedPath);
    }

    // A colon in the first segment reads as a scheme (`https:`, `javascript:`).
    let first = path.split('/').next().unwrap_or_default();
    if first.contains(':') {
        return Err(GatewayError::UnsupportedPath);
    }

    if path.split('/').any(is_dot_segment) {
        return Err(GatewayError::UnsupportedPath);
    }

    if let Some(query) = query {
        let sets_reserved = url::form_urlencoded::parse(query.as_bytes())
            .any(|(k, _)| RESERVED_QUERY.contains(&&*k));
        if sets_reserved {
            return Err(GatewayError::UnsupportedPath);
        }
    }

    Ok((path, query))
}

/// `.` and `..`, including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Final guard: the parsed URL must stay on the base host and under its path.
fn ensure_same_host(base: &str, url: &str) -> GatewayResult<()> {
    let base = Url::parse(base).map_err(|_| GatewayError::UnsupportedPath)?;
    let target = Url::parse(url).map_err(|_| GatewayError::UnsupportedPath)?;

    let same_origin = base.origin() == target.origin();
    let under_base = target.path().starts_with(base.path().trim_end_matches('/'));
    if same_origin && under_base {
        Ok(())
    } else {
        Err(GatewayError::UnsupportedPath)
    }
}
