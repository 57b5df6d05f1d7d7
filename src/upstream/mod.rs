//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundCall (from routing)
//!     → client.rs (one reqwest call, hard deadline)
//!     → UpstreamReply { status, body }
//!     → http/response.rs (translation)
//! ```
//!
//! `gemini.rs` holds the request/reply shapes specific to the chat route.

pub mod call;
pub mod client;
pub mod gemini;

pub use call::OutboundCall;
pub use client::{Dispatcher, UpstreamReply};
