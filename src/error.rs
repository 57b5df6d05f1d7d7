//! Gateway error taxonomy.
//!
//! Every failure the gateway can hit maps to one variant here and from there
//! to a status code and a `{"error": ...}` body. Non-2xx upstream replies and
//! non-JSON upstream bodies are not errors; they are relayed.

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::SecretName;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Missing or unknown `action`.
    #[error("Invalid action")]
    UnknownAction,

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("Invalid JSON body")]
    InvalidBody,

    /// Body over `security.max_body_size`, rejected before the handler runs.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Whole request exceeded `timeouts.request_secs`.
    #[error("Request timed out")]
    RequestTimeout,

    /// Passthrough path tried to leave the upstream host.
    #[error("Unsupported path")]
    UnsupportedPath,

    #[error("{0} not configured")]
    SecretsNotConfigured(SecretName),

    /// DNS, connect, reset or deadline failure on the outbound call.
    #[error("Upstream request failed")]
    UpstreamUnreachable(#[source] reqwest::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::UnknownAction
            | GatewayError::MissingParameter(_)
            | GatewayError::InvalidParameter(_)
            | GatewayError::InvalidBody
            | GatewayError::UnsupportedPath => StatusCode::BAD_REQUEST,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            GatewayError::SecretsNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MethodNotAllowed => "method_not_allowed",
            GatewayError::UnknownAction => "unknown_action",
            GatewayError::MissingParameter(_) => "missing_parameter",
            GatewayError::InvalidParameter(_) => "invalid_parameter",
            GatewayError::InvalidBody => "invalid_body",
            GatewayError::UnsupportedPath => "unsupported_path",
            GatewayError::PayloadTooLarge => "payload_too_large",
            GatewayError::RequestTimeout => "request_timeout",
            GatewayError::SecretsNotConfigured(_) => "secrets_not_configured",
            GatewayError::UpstreamUnreachable(_) => "upstream_unreachable",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
