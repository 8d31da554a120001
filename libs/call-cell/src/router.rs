// libs/call-cell/src/router.rs
use axum::{routing::post, Router};

use crate::handlers;
use crate::CallState;

pub fn call_routes(state: CallState) -> Router {
    Router::new()
        .route("/send-to-vapi", post(handlers::send_to_call))
        .route("/log-call", post(handlers::log_call))
        .with_state(state)
}
