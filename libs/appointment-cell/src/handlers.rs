// libs/appointment-cell/src/handlers.rs
use axum::{extract::State, Json};
use chrono::{Local, Utc};

use shared_models::error::AppError;
use shared_utils::extractor::{ValidatedJson, ValidatedQuery};

use crate::models::{
    AvailabilityCheckRequest, AvailabilityResponse, BookingRequest, BookingResponse, SlotsQuery,
    SlotsResponse, StatsResponse,
};
use crate::services::{AvailabilityService, BookingService, SlotService, StatsService};
use crate::AppointmentState;

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<AppointmentState>,
    ValidatedJson(request): ValidatedJson<AvailabilityCheckRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let response = availability_service
        .check_availability(&request, Local::now().date_naive())
        .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentState>,
    ValidatedJson(request): ValidatedJson<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking_service = BookingService::new(&state);

    let response = booking_service.book(&request, Utc::now()).await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppointmentState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats_service = StatsService::new(&state);

    let stats = stats_service
        .get_stats(Local::now().date_naive(), Utc::now())
        .await?;

    Ok(Json(stats))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<AppointmentState>,
    ValidatedQuery(query): ValidatedQuery<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    let slot_service = SlotService::new(&state);

    let slots = slot_service
        .list_available(&query, Local::now().date_naive())
        .await?;

    Ok(Json(slots))
}
