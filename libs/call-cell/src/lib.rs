pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

pub use models::*;
pub use router::call_routes;
pub use services::*;

/// Handles shared by the call relay and call logging handlers.
#[derive(Clone)]
pub struct CallState {
    pub relay: Arc<VapiClient>,
    pub logs: CallLogQueue,
}

impl CallState {
    pub fn new(relay: Arc<VapiClient>, logs: CallLogQueue) -> Self {
        Self { relay, logs }
    }
}
