//! Response shaping.
//!
//! # Responsibilities
//! - Translate a buffered upstream reply into the relayed body
//! - Render gateway errors as `{"error": ...}`
//! - Always label bodies as `application/json`
//!
//! # Design Decisions
//! - Valid upstream JSON is relayed byte-for-byte
//! - Non-JSON upstream text is wrapped as `{"raw": text}`, never dropped
//! - Upstream status codes pass through unchanged, errors included

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::routing::spec::ReplyKind;
use crate::upstream::client::UpstreamReply;
use crate::upstream::gemini;

/// What goes back to the caller.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ProxyResponse {
    /// JSON response with an already serialized body.
    pub fn json_text(status: StatusCode, body: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { status, headers, body }
    }

    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self::json_text(status, value.to_string())
    }

    /// Empty `204` for CORS preflight.
    pub fn preflight() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub fn from_error(err: &GatewayError) -> Self {
        Self::json(err.status(), &json!({ "error": err.to_string() }))
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Turn an upstream reply into the relayed response.
pub fn translate(reply: UpstreamReply, kind: ReplyKind) -> ProxyResponse {
    let parsed = serde_json::from_str::<Value>(&reply.body).ok();

    match (kind, parsed) {
        (ReplyKind::Chat, Some(data)) if reply.status.is_success() => {
            let text = gemini::extract_reply(&data);
            ProxyResponse::json(reply.status, &json!({ "reply": text, "raw": data }))
        }
        (_, Some(_)) => ProxyResponse::json_text(reply.status, reply.body),
        (_, None) => {
            tracing::debug!(status = reply.status.as_u16(), "Upstream body is not JSON, wrapping");
            ProxyResponse::json(reply.status, &json!({ "raw": reply.body }))
        }
    }
}
