//! Action-routed gateway in front of the Trello and Gemini REST APIs.
//!
//! Callers name an `action` (or a raw Trello `path`); the gateway binds
//! parameters and server-held credentials into one outbound call and relays
//! the reply as JSON.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use config::SecretStore;
pub use error::GatewayError;
pub use gateway::Gateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
