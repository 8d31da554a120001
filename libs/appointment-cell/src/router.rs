// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::AppointmentState;

pub fn appointment_routes(state: AppointmentState) -> Router {
    Router::new()
        .route("/check-availability", post(handlers::check_availability))
        .route("/book-appointment", post(handlers::book_appointment))
        .route("/stats", get(handlers::get_stats))
        .route("/slots", get(handlers::get_available_slots))
        .with_state(state)
}
