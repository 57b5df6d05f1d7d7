//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!
//! environment
//!     → secrets.rs (SecretStore, read once)
//!
//! Both are moved into the gateway at construction and shared via Arc.
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Secrets never live in the config file

pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    CorsConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, SecurityConfig,
    TimeoutConfig, UpstreamConfig,
};
pub use secrets::{SecretName, SecretStore};
