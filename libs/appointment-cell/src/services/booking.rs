// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use shared_database::{to_fields, RecordStore};
use shared_models::error::AppError;

use crate::models::{AppointmentFields, BookingRequest, BookingResponse, SlotReservation};
use crate::services::availability::AvailabilityService;
use crate::AppointmentState;

pub struct BookingService {
    store: Arc<dyn RecordStore>,
    appointments_table: String,
    slots_table: String,
    availability: AvailabilityService,
}

impl BookingService {
    pub fn new(state: &AppointmentState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            appointments_table: state.config.appointments_table.clone(),
            slots_table: state.config.slots_table.clone(),
            availability: AvailabilityService::new(state),
        }
    }

    /// Re-checks the slot, creates the appointment, then marks the slot booked.
    ///
    /// If the slot cannot be marked, the appointment is deleted again so no
    /// confirmed appointment is left pointing at an unclaimed slot. Two
    /// concurrent bookings of the same slot can still both pass the re-check.
    pub async fn book(&self, request: &BookingRequest, now: DateTime<Utc>) -> Result<BookingResponse, AppError> {
        info!("Booking appointment for {} on {}", request.patient_name, request.date);

        let slot = self
            .availability
            .find_open_slot(&request.date, &request.time)
            .await?
            .ok_or_else(|| AppError::Conflict("Slot no longer available".to_string()))?;

        let timestamp = now.to_rfc3339();

        let appointment_fields = to_fields(&AppointmentFields::confirmed(request, timestamp.clone()))
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let appointment = self
            .store
            .create(&self.appointments_table, appointment_fields)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reservation = to_fields(&SlotReservation {
            booked: true,
            booked_by: request.patient_phone.clone(),
            booked_at: timestamp,
        })
        .map_err(|e| AppError::Internal(e.to_string()))?;

        if let Err(e) = self.store.update(&self.slots_table, &slot.id, reservation).await {
            error!("Failed to mark slot {} as booked: {}", slot.id, e);
            self.roll_back(&appointment.id).await;
            return Err(AppError::Database(format!("Failed to reserve slot: {}", e)));
        }

        info!("Successfully booked appointment: {}", appointment.id);

        Ok(BookingResponse {
            success: true,
            appointment_id: appointment.id,
            date: request.date.clone(),
            time: request.time.clone(),
            message: format!("Appointment confirmed for {} at {}", request.date, request.time),
        })
    }

    async fn roll_back(&self, appointment_id: &str) {
        match self.store.delete(&self.appointments_table, appointment_id).await {
            Ok(()) => warn!("Rolled back appointment {} after slot update failure", appointment_id),
            Err(e) => error!(
                "Rollback failed, appointment {} exists without a booked slot: {}",
                appointment_id, e
            ),
        }
    }
}
