//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every gateway response (success, error, preflight):
//!     → cors.rs (CorsLayer: allow-list check, CORS headers, preflight)
//!     → Send to client
//! ```
//!
//! Body size limits are enforced by the server's body-limit layer; secrets
//! never leave [`crate::config::secrets`] except inside outbound calls.

pub mod cors;

pub use cors::cors_layer;
