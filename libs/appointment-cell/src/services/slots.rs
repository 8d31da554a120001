// libs/appointment-cell/src/services/slots.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::info;

use shared_database::formula::DateArg;
use shared_database::{Formula, ListQuery, RecordStore};
use shared_models::error::AppError;
use shared_utils::validation::parse_date;

use crate::models::{
    slot_fields, DateRange, SlotSummary, SlotsQuery, SlotsResponse, DEFAULT_SLOT_LIMIT,
    DEFAULT_SLOT_RANGE_DAYS,
};
use crate::AppointmentState;

pub struct SlotService {
    store: Arc<dyn RecordStore>,
    slots_table: String,
}

impl SlotService {
    pub fn new(state: &AppointmentState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            slots_table: state.config.slots_table.clone(),
        }
    }

    /// Unbooked slots dated strictly between the range bounds, ordered by
    /// date then time.
    pub async fn list_available(&self, query: &SlotsQuery, today: NaiveDate) -> Result<SlotsResponse, AppError> {
        let start = match query.start_date.as_deref() {
            Some(raw) => parse_date("start_date", raw)?,
            None => today,
        };
        let end = match query.end_date.as_deref() {
            Some(raw) => parse_date("end_date", raw)?,
            None => today + Duration::days(DEFAULT_SLOT_RANGE_DAYS),
        };
        let limit = query.limit.unwrap_or(DEFAULT_SLOT_LIMIT).max(1) as usize;

        info!("Listing available slots between {} and {} (limit {})", start, end, limit);

        let list_query = ListQuery::new()
            .filter(Formula::and([
                Formula::is_after(slot_fields::DATE, DateArg::Date(start)),
                Formula::is_before(slot_fields::DATE, DateArg::Date(end)),
                Formula::is_false(slot_fields::BOOKED),
            ]))
            .sort_asc(slot_fields::DATE)
            .sort_asc(slot_fields::TIME)
            .max_records(limit);

        let records = self
            .store
            .list(&self.slots_table, list_query)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let slots: Vec<SlotSummary> = records.iter().take(limit).map(SlotSummary::from).collect();

        Ok(SlotsResponse {
            count: slots.len(),
            slots,
            date_range: DateRange {
                start: start.format("%Y-%m-%d").to_string(),
                end: end.format("%Y-%m-%d").to_string(),
            },
        })
    }
}
