//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, normalize query + JSON body)
//!     → [gateway resolves, binds, dispatches]
//!     → response.rs (translate upstream reply, render errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, MakeRequestUuid, X_REQUEST_ID};
pub use response::ProxyResponse;
pub use server::HttpServer;
