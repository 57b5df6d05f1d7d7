//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (action | path, params, headers)
//!     → router.rs (action → RouteSpec, exact match)
//!     → binder.rs (RouteSpec + params + secrets → OutboundCall)
//!
//! or, with `path` instead of `action`:
//!     → passthrough.rs (relative path + bearer → OutboundCall)
//!
//! Route compilation (at startup):
//!     table.rs ROUTES → RouteTable (HashMap, frozen)
//! ```
//!
//! # Design Decisions
//! - One declarative table; no per-action code paths
//! - Routes are immutable at runtime
//! - Deterministic: same input always binds to the same URL

pub mod binder;
pub mod passthrough;
pub mod router;
pub mod spec;
pub mod table;

pub use binder::bind;
pub use passthrough::bind_passthrough;
pub use router::RouteTable;
pub use spec::{HttpMethod, ReplyKind, RouteSpec, Upstream};
