//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Validation is a pure function
//! over [`GatewayConfig`] and reports every problem, not just the first.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field}: '{value}' must be an absolute http(s) URL without query or fragment")]
    InvalidBaseUrl { field: &'static str, value: String },

    #[error("cors.allowed_origins: '{0}' is neither '*' nor scheme://host[:port]")]
    InvalidOrigin(String),
}

/// Validate a configuration. Returns all errors found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.upstream_secs" });
    }

    for (field, value) in [
        ("upstreams.trello_base_url", &config.upstreams.trello_base_url),
        ("upstreams.gemini_base_url", &config.upstreams.gemini_base_url),
    ] {
        if !is_valid_base_url(value) {
            errors.push(ValidationError::InvalidBaseUrl {
                field,
                value: value.clone(),
            });
        }
    }

    for origin in &config.cors.allowed_origins {
        if !is_valid_origin(origin) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_base_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some()
                && url.query().is_none()
                && url.fragment().is_none()
        }
        Err(_) => false,
    }
}

fn is_valid_origin(origin: &str) -> bool {
    if origin == "*" {
        return true;
    }
    match Url::parse(origin) {
        // An origin serializes without a trailing path.
        Ok(url) => url.host_str().is_some() && url.origin().ascii_serialization() == origin,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.upstream_secs = 0;
        config.upstreams.trello_base_url = "ftp://api.trello.com/1".into();
        config.upstreams.gemini_base_url = "https://example.com/?key=1".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroTimeout {
            field: "timeouts.upstream_secs"
        }));
    }

    #[test]
    fn origins_must_be_bare() {
        let mut config = GatewayConfig::default();
        config.cors.allowed_origins = vec![
            "*".into(),
            "https://app.example.com".into(),
            "http://localhost:3000".into(),
            "https://app.example.com/".into(),
            "app.example.com".into(),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidOrigin("https://app.example.com/".into()),
                ValidationError::InvalidOrigin("app.example.com".into()),
            ]
        );
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
