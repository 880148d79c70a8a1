//! The `virtual:convention-routes` module.
//!
//! Serves the latest published tree. Each pass publishes a fresh tree with a
//! single atomic swap, so a load never sees a half-built tree.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::codegen;
use crate::route::RouteRecord;

/// Public module id.
pub const VIRTUAL_ID: &str = "virtual:convention-routes";

/// Resolved id; the `\0` prefix keeps other resolvers away from it.
pub const RESOLVED_VIRTUAL_ID: &str = "\0virtual:convention-routes";

/// Served before the first pass has published anything.
const EMPTY_MODULE: &str = "export default [];";

#[derive(Default)]
pub struct VirtualRoutes {
    current: ArcSwapOption<Vec<RouteRecord>>,
}

impl VirtualRoutes {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the served tree.
    pub fn publish(&self, routes: Vec<RouteRecord>) {
        self.current.store(Some(Arc::new(routes)));
    }

    pub fn snapshot(&self) -> Option<Arc<Vec<RouteRecord>>> {
        self.current.load_full()
    }

    /// Map the public id to the resolved id; other ids are not ours.
    pub fn resolve_id(id: &str) -> Option<&'static str> {
        (id == VIRTUAL_ID).then_some(RESOLVED_VIRTUAL_ID)
    }

    /// Module source for a resolved id.
    pub fn load(&self, id: &str) -> Option<String> {
        if id != RESOLVED_VIRTUAL_ID {
            return None;
        }
        Some(match self.snapshot() {
            Some(routes) => codegen::render(&routes).to_module(),
            None => EMPTY_MODULE.to_string(),
        })
    }
}
