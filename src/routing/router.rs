//! Route lookup.
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap keyed by the exact action name
//! - Case-sensitive, no trimming, no synonyms
//! - Explicit `UnknownAction` rather than a silent default

use std::collections::HashMap;

use crate::error::{GatewayError, GatewayResult};
use crate::routing::spec::RouteSpec;
use crate::routing::table::ROUTES;

/// Compiled action → route map.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<&'static str, &'static RouteSpec>,
}

impl RouteTable {
    /// Build from a slice of specs. Later duplicates replace earlier ones.
    pub fn new(specs: &'static [RouteSpec]) -> Self {
        let routes = specs.iter().map(|spec| (spec.action, spec)).collect();
        Self { routes }
    }

    /// Resolve an action name to its route.
    pub fn resolve(&self, action: &str) -> GatewayResult<&'static RouteSpec> {
        self.routes
            .get(action)
            .copied()
            .ok_or(GatewayError::UnknownAction)
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.routes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}
