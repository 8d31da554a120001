// libs/appointment-cell/src/services/stats.rs
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use shared_database::{Formula, ListQuery, RecordStore};
use shared_models::error::AppError;

use crate::models::{appointment_fields, slot_fields, StatsResponse, BOOKING_SOURCE_AI};
use crate::AppointmentState;

pub struct StatsService {
    store: Arc<dyn RecordStore>,
    appointments_table: String,
    slots_table: String,
}

impl StatsService {
    pub fn new(state: &AppointmentState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            appointments_table: state.config.appointments_table.clone(),
            slots_table: state.config.slots_table.clone(),
        }
    }

    pub async fn get_stats(&self, today: NaiveDate, now: DateTime<Utc>) -> Result<StatsResponse, AppError> {
        let today = today.format("%Y-%m-%d").to_string();

        let total_appointments = self.count(&self.appointments_table, ListQuery::new()).await?;

        let today_appointments = self
            .count(
                &self.appointments_table,
                ListQuery::new().filter(Formula::equals(appointment_fields::DATE, &today)),
            )
            .await?;

        let ai_booked_appointments = self
            .count(
                &self.appointments_table,
                ListQuery::new().filter(Formula::equals(appointment_fields::BOOKING_SOURCE, BOOKING_SOURCE_AI)),
            )
            .await?;

        let available_slots = self
            .count(
                &self.slots_table,
                ListQuery::new().filter(Formula::is_false(slot_fields::BOOKED)),
            )
            .await?;

        Ok(StatsResponse {
            total_appointments,
            today_appointments,
            ai_booked_appointments,
            available_slots,
            status: "operational".to_string(),
            timestamp: now.to_rfc3339(),
        })
    }

    async fn count(&self, table: &str, query: ListQuery) -> Result<usize, AppError> {
        let records = self
            .store
            .list(table, query)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        debug!("{} matching records in {}", records.len(), table);
        Ok(records.len())
    }
}
