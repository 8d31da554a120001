// libs/call-cell/src/handlers.rs
use axum::{extract::State, Json};
use tracing::info;

use shared_models::error::AppError;
use shared_utils::extractor::ValidatedJson;

use crate::models::{CallLogAck, CallLogRequest, CallRelayRequest, CallRelayResponse};
use crate::CallState;

#[axum::debug_handler]
pub async fn send_to_call(
    State(state): State<CallState>,
    ValidatedJson(request): ValidatedJson<CallRelayRequest>,
) -> Result<Json<CallRelayResponse>, AppError> {
    let vapi_response = state
        .relay
        .send_message(&request.call_sid, &request.message, &request.function_result)
        .await?;

    Ok(Json(CallRelayResponse::sent(vapi_response)))
}

/// Acknowledges immediately; the record is written by the call log worker.
#[axum::debug_handler]
pub async fn log_call(
    State(state): State<CallState>,
    ValidatedJson(request): ValidatedJson<CallLogRequest>,
) -> Result<Json<CallLogAck>, AppError> {
    info!("Logging call: {}", request.call_id);

    let call_id = request.call_id.clone();
    state.logs.enqueue(request)?;

    Ok(Json(CallLogAck::logging(call_id)))
}
