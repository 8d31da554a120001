pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::RecordStore;

pub use models::*;
pub use router::appointment_routes;
pub use services::*;

/// Handles shared by every appointment handler.
#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
}

impl AppointmentState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn RecordStore>) -> Self {
        Self { config, store }
    }
}
