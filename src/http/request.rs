//! Inbound request normalization.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Collapse query string and JSON body into one parameter view
//! - Extract the routing inputs (`action`, `path`) and caller credentials
//!
//! # Design Decisions
//! - The JSON body wins over the query string when both carry a parameter
//! - Only scalar JSON values can become URL parameters
//! - A body that is present but not JSON is rejected, not ignored

use std::collections::HashMap;

use axum::http::{header, HeaderMap, HeaderValue, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::routing::spec::HttpMethod;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID set by the middleware, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The `Origin` header, if it is valid UTF-8.
pub fn origin_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A normalized inbound call. Lives for one request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: HttpMethod,
    pub origin: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl InboundRequest {
    /// Build from the raw pieces of an HTTP request.
    ///
    /// An empty (or whitespace-only) body is treated as no body.
    pub fn parse(
        method: HttpMethod,
        headers: HeaderMap,
        query: Option<&str>,
        body: &[u8],
    ) -> GatewayResult<Self> {
        let mut params = HashMap::new();
        if let Some(query) = query {
            for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
                params.entry(k.into_owned()).or_insert_with(|| v.into_owned());
            }
        }

        let body = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(body).map_err(|_| GatewayError::InvalidBody)?)
        };

        Ok(Self {
            method,
            origin: origin_of(&headers),
            query: params,
            body,
            headers,
        })
    }

    /// Look up a parameter in the JSON body, then the query string.
    pub fn param(&self, name: &str) -> Option<String> {
        self.body_field(name)
            .and_then(scalar_to_string)
            .or_else(|| self.query.get(name).cloned())
    }

    /// Raw JSON field from the body object.
    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(name))
    }

    /// The `action` parameter, when non-empty.
    pub fn action(&self) -> Option<String> {
        self.param("action").filter(|a| !a.is_empty())
    }

    /// The passthrough `path` parameter, when non-empty.
    pub fn raw_path(&self) -> Option<String> {
        self.param("path").filter(|p| !p.is_empty())
    }

    /// Caller token from `Authorization: Bearer <token>`.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(query: Option<&str>, body: &str) -> GatewayResult<InboundRequest> {
        InboundRequest::parse(HttpMethod::Post, HeaderMap::new(), query, body.as_bytes())
    }

    #[test]
    fn query_params_are_decoded() {
        let req = inbound(Some("action=createCard&name=A+%26+B&listId=L1"), "").unwrap();
        assert_eq!(req.action().as_deref(), Some("createCard"));
        assert_eq!(req.param("name").as_deref(), Some("A & B"));
        assert_eq!(req.param("listId").as_deref(), Some("L1"));
        assert!(req.body.is_none());
    }

    #[test]
    fn body_wins_over_query() {
        let req = inbound(Some("name=query"), r#"{"name":"body","pos":3,"closed":false}"#).unwrap();
        assert_eq!(req.param("name").as_deref(), Some("body"));
        assert_eq!(req.param("pos").as_deref(), Some("3"));
        assert_eq!(req.param("closed").as_deref(), Some("false"));
    }

    #[test]
    fn non_scalar_body_values_fall_back_to_query() {
        let req = inbound(Some("history=q"), r#"{"history":[1,2]}"#).unwrap();
        assert_eq!(req.param("history").as_deref(), Some("q"));
        assert!(req.body_field("history").unwrap().is_array());
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(matches!(inbound(None, "{not json"), Err(GatewayError::InvalidBody)));
        assert!(inbound(None, "  \n").unwrap().body.is_none());
    }

    #[test]
    fn empty_action_is_absent() {
        let req = inbound(Some("action="), "").unwrap();
        assert_eq!(req.action(), None);
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer user-tok"));
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://app.example.com"));
        let req = InboundRequest::parse(HttpMethod::Get, headers, None, b"").unwrap();
        assert_eq!(req.bearer_token(), Some("user-tok"));
        assert_eq!(req.origin.as_deref(), Some("https://app.example.com"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        let req = InboundRequest::parse(HttpMethod::Get, headers, None, b"").unwrap();
        assert_eq!(req.bearer_token(), None);
    }

    #[test]
    fn request_ids_are_uuids() {
        let mut make = MakeRequestUuid;
        let req = Request::builder().body(()).unwrap();
        let id = make.make_request_id(&req).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }
}
