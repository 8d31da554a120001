// libs/appointment-cell/src/services/availability.rs
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::{debug, error, info};

use shared_database::formula::DateArg;
use shared_database::{Formula, ListQuery, RecordStore};
use shared_models::error::AppError;
use shared_models::Record;
use shared_utils::validation::parse_date;

use crate::models::{
    slot_fields, AlternativeSlot, AvailabilityCheckRequest, AvailabilityResponse,
    ALTERNATIVE_CANDIDATES, MAX_ALTERNATIVE_WINDOW_DAYS,
};
use crate::AppointmentState;

pub struct AvailabilityService {
    store: Arc<dyn RecordStore>,
    slots_table: String,
    window_days: i64,
}

impl AvailabilityService {
    pub fn new(state: &AppointmentState) -> Self {
        Self {
            store: Arc::clone(&state.store),
            slots_table: state.config.slots_table.clone(),
            window_days: state
                .config
                .alternative_slots_window_days
                .clamp(0, MAX_ALTERNATIVE_WINDOW_DAYS),
        }
    }

    /// The unbooked slot at exactly `date` + `time`, if any.
    pub async fn find_open_slot(&self, date: &str, time: &str) -> Result<Option<Record>, AppError> {
        let query = ListQuery::new()
            .filter(Formula::and([
                Formula::equals(slot_fields::DATE, date),
                Formula::equals(slot_fields::TIME, time),
                Formula::is_false(slot_fields::BOOKED),
            ]))
            .max_records(1);

        let slots = self
            .store
            .list(&self.slots_table, query)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(slots.into_iter().next())
    }

    pub async fn check_availability(
        &self,
        request: &AvailabilityCheckRequest,
        today: NaiveDate,
    ) -> Result<AvailabilityResponse, AppError> {
        info!("Checking availability for {} at {}", request.date, request.time);

        if let Some(slot) = self.find_open_slot(&request.date, &request.time).await? {
            info!("Slot available: {}", slot.id);
            return Ok(AvailabilityResponse::available(slot.id, request));
        }

        info!("Slot not available for {} at {}", request.date, request.time);

        let preferred = parse_date("date", &request.date)?;
        let alternatives = self.alternative_slots(preferred, today).await;

        Ok(AvailabilityResponse::unavailable(alternatives))
    }

    /// Open slots near `preferred`, never more than [`ALTERNATIVE_CANDIDATES`].
    /// Lookup failures are logged and yield an empty list.
    pub async fn alternative_slots(&self, preferred: NaiveDate, today: NaiveDate) -> Vec<AlternativeSlot> {
        let query = alternatives_query(preferred, today, self.window_days);
        debug!("Alternative slots query: {:?}", query.formula);

        match self.store.list(&self.slots_table, query).await {
            Ok(slots) => slots
                .iter()
                .take(ALTERNATIVE_CANDIDATES)
                .map(AlternativeSlot::from)
                .collect(),
            Err(e) => {
                error!("Error getting alternatives: {}", e);
                Vec::new()
            }
        }
    }
}

/// Unbooked slots dated after today and within `window_days` of `preferred`
/// (capped at [`MAX_ALTERNATIVE_WINDOW_DAYS`]). When the whole window is
/// already in the past, or runs off the calendar, every future slot qualifies.
pub(crate) fn alternatives_query(preferred: NaiveDate, today: NaiveDate, window_days: i64) -> ListQuery {
    let window = Duration::days(window_days.clamp(0, MAX_ALTERNATIVE_WINDOW_DAYS) + 1);
    let lower = preferred
        .checked_sub_signed(window)
        .map_or(today, |start| start.max(today));
    let upper = preferred
        .checked_add_signed(window)
        .filter(|upper| *upper - lower > Duration::days(1));

    let mut clauses = vec![Formula::is_after(slot_fields::DATE, DateArg::Date(lower))];
    if let Some(upper) = upper {
        clauses.push(Formula::is_before(slot_fields::DATE, DateArg::Date(upper)));
    }
    clauses.push(Formula::is_false(slot_fields::BOOKED));

    ListQuery::new()
        .filter(Formula::and(clauses))
        .sort_asc(slot_fields::DATE)
        .sort_asc(slot_fields::TIME)
        .max_records(ALTERNATIVE_CANDIDATES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_around_future_date() {
        let query = alternatives_query(date(2024, 3, 20), date(2024, 3, 1), 7);
        assert_eq!(
            query.formula.unwrap().as_str(),
            "AND(IS_AFTER({Date}, '2024-03-12'), IS_BEFORE({Date}, '2024-03-28'), {Booked}=FALSE())"
        );
        assert_eq!(query.max_records, Some(ALTERNATIVE_CANDIDATES));
        assert_eq!(query.sort.len(), 2);
    }

    #[test]
    fn test_window_clamped_to_today() {
        let query = alternatives_query(date(2024, 3, 3), date(2024, 3, 1), 7);
        assert_eq!(
            query.formula.unwrap().as_str(),
            "AND(IS_AFTER({Date}, '2024-03-01'), IS_BEFORE({Date}, '2024-03-11'), {Booked}=FALSE())"
        );
    }

    #[test]
    fn test_oversized_window_is_capped() {
        let query = alternatives_query(date(2030, 6, 10), date(2030, 6, 1), 100_000_000_000);
        assert_eq!(
            query.formula.unwrap().as_str(),
            "AND(IS_AFTER({Date}, '2030-06-01'), IS_BEFORE({Date}, '2031-06-11'), {Booked}=FALSE())"
        );

        let negative = alternatives_query(date(2030, 6, 10), date(2030, 6, 1), -5);
        assert_eq!(
            negative.formula.unwrap().as_str(),
            "AND(IS_AFTER({Date}, '2030-06-09'), IS_BEFORE({Date}, '2030-06-11'), {Booked}=FALSE())"
        );
    }

    #[test]
    fn test_window_at_calendar_edge_drops_upper_bound() {
        let query = alternatives_query(NaiveDate::MAX, date(2030, 6, 1), 7);
        assert!(!query.formula.unwrap().as_str().contains("IS_BEFORE"));
    }

    #[test]
    fn test_past_window_falls_back_to_all_future_slots() {
        let query = alternatives_query(date(2024, 1, 1), date(2024, 3, 1), 7);
        assert_eq!(
            query.formula.unwrap().as_str(),
            "AND(IS_AFTER({Date}, '2024-03-01'), {Booked}=FALSE())"
        );
    }
}
