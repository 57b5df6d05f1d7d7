//! Parameter binding: route + inbound request + secrets → outbound call.
//!
//! # Order of checks
//! 1. Every required parameter must be present and non-empty
//! 2. Path values must not be dot segments
//! 3. Every secret the route needs must be configured
//!
//! Caller values are percent-encoded (RFC 3986 unreserved characters kept)
//! before they touch the URL, so `&`, `?`, `/` and `#` stay inside their
//! parameter.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::{SecretStore, UpstreamConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::InboundRequest;
use crate::routing::spec::{BodyKind, ParamSpec, Placement, Presence, RouteSpec, SecretPlacement};
use crate::upstream::call::{base_url, OutboundCall};
use crate::upstream::gemini;

/// Resolved credentials for one route, split by placement.
#[derive(Default)]
pub(crate) struct Credentials {
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, String)>,
}

pub(crate) fn collect_credentials(route: &RouteSpec, secrets: &SecretStore) -> GatewayResult<Credentials> {
    let mut credentials = Credentials::default();
    for binding in route.secrets {
        let value = secrets
            .get(binding.secret)
            .ok_or(GatewayError::SecretsNotConfigured(binding.secret))?
            .to_string();
        match binding.placement {
            SecretPlacement::Query(name) => credentials.query.push((name, value)),
            SecretPlacement::Header(name) => credentials.headers.push((name, value)),
        }
    }
    Ok(credentials)
}

/// Bind a route against an inbound request.
pub fn bind(
    route: &RouteSpec,
    inbound: &InboundRequest,
    secrets: &SecretStore,
    upstreams: &UpstreamConfig,
) -> GatewayResult<OutboundCall> {
    let mut path_values: HashMap<&str, String> = HashMap::new();
    let mut query: Vec<(&str, String)> = Vec::new();

    for spec in route.params {
        let value = resolve_value(spec, inbound, secrets)?;
        match spec.placement {
            Placement::Path => {
                if value == "." || value == ".." {
                    return Err(GatewayError::InvalidParameter(spec.name));
                }
                path_values.insert(spec.name, value);
            }
            Placement::Query(upstream_name) => query.push((upstream_name, value)),
            Placement::Body => {}
        }
    }

    let credentials = collect_credentials(route, secrets)?;

    let mut url = format!(
        "{}{}",
        base_url(upstreams, route.upstream),
        render_path(route.path, &path_values)?
    );
    query.extend(credentials.query);
    append_query(&mut url, &query);

    let body = match route.body {
        BodyKind::None => None,
        BodyKind::GeminiChat => Some(gemini::generate_content_payload(
            inbound
                .body_field("message")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            inbound.body_field("history"),
        )),
    };

    Ok(OutboundCall {
        upstream: route.upstream,
        method: route.method,
        url,
        headers: credentials.headers,
        body,
    })
}

fn resolve_value(
    spec: &ParamSpec,
    inbound: &InboundRequest,
    secrets: &SecretStore,
) -> GatewayResult<String> {
    let supplied = match spec.placement {
        // Body parameters must be JSON strings.
        Placement::Body => inbound
            .body_field(spec.name)
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => inbound.param(spec.name),
    }
    .filter(|v| !v.is_empty());

    match (supplied, spec.presence) {
        (Some(value), _) => Ok(value),
        (None, Presence::Required) => Err(GatewayError::MissingParameter(spec.name)),
        (None, Presence::Optional) => Ok(String::new()),
        (None, Presence::ModelFallback) => Ok(secrets.model().to_string()),
    }
}

/// Substitute `{name}` placeholders with encoded values.
fn render_path(template: &'static str, values: &HashMap<&str, String>) -> GatewayResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or(GatewayError::InvalidParameter(template))?;
        let name = &after[..close];
        let value = values
            .get(name)
            .ok_or(GatewayError::MissingParameter(name))?;
        out.push_str(&urlencoding::encode(value));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

pub(crate) fn append_query(url: &mut String, pairs: &[(&str, String)]) {
    for (i, (name, value)) in pairs.iter().enumerate() {
        let sep = if i == 0 && !url.contains('?') { '?' } else { '&' };
        url.push(sep);
        url.push_str(&urlencoding::encode(name));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
}
