// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_models::Record;
use shared_utils::validation::{parse_date, parse_time, require_non_blank, require_range, Validate};

pub const DEFAULT_DURATION_MINUTES: i64 = 30;
pub const MAX_DURATION_MINUTES: i64 = 480;
pub const DEFAULT_SLOT_LIMIT: i64 = 50;
pub const MAX_SLOT_LIMIT: i64 = 1000;
pub const DEFAULT_SLOT_RANGE_DAYS: i64 = 30;

/// Raw candidates fetched by the alternatives lookup.
pub const ALTERNATIVE_CANDIDATES: usize = 10;
/// Alternatives surfaced to the caller.
pub const MAX_ALTERNATIVES: usize = 5;
/// Upper bound on the configured alternatives window, in days.
pub const MAX_ALTERNATIVE_WINDOW_DAYS: i64 = 365;

pub const STATUS_CONFIRMED: &str = "Confirmed";
pub const BOOKING_SOURCE_AI: &str = "AI Receptionist";
pub const DEFAULT_REASON: &str = "General checkup";

/// Column names in the slots table.
pub mod slot_fields {
    pub const DATE: &str = "Date";
    pub const TIME: &str = "Time";
    pub const DURATION: &str = "Duration";
    pub const BOOKED: &str = "Booked";
    pub const BOOKED_BY: &str = "Booked By";
    pub const BOOKED_AT: &str = "Booked At";
}

/// Column names in the appointments table.
pub mod appointment_fields {
    pub const DATE: &str = "Appointment Date";
    pub const BOOKING_SOURCE: &str = "Booking Source";
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINUTES
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityCheckRequest {
    pub date: String,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: i64,
}

impl Validate for AvailabilityCheckRequest {
    fn validate(&self) -> Result<(), AppError> {
        parse_date("date", &self.date)?;
        parse_time("time", &self.time)?;
        require_range("duration", self.duration, 1, MAX_DURATION_MINUTES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub patient_name: String,
    pub patient_phone: String,
    #[serde(default = "default_duration")]
    pub duration: i64,
    pub reason: Option<String>,
    pub call_id: Option<String>,
}

impl Validate for BookingRequest {
    fn validate(&self) -> Result<(), AppError> {
        parse_date("date", &self.date)?;
        parse_time("time", &self.time)?;
        require_non_blank("patient_name", &self.patient_name)?;
        require_non_blank("patient_phone", &self.patient_phone)?;
        require_range("duration", self.duration, 1, MAX_DURATION_MINUTES)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

impl Validate for SlotsQuery {
    fn validate(&self) -> Result<(), AppError> {
        let start = self.start_date.as_deref().map(|d| parse_date("start_date", d)).transpose()?;
        let end = self.end_date.as_deref().map(|d| parse_date("end_date", d)).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::ValidationError(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        if let Some(limit) = self.limit {
            require_range("limit", limit, 1, MAX_SLOT_LIMIT)?;
        }

        Ok(())
    }
}

// ==============================================================================
// STORE RECORDS
// ==============================================================================

/// Fields written when an appointment is created.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentFields {
    #[serde(rename = "Patient Name")]
    pub patient_name: String,
    #[serde(rename = "Patient Phone")]
    pub patient_phone: String,
    #[serde(rename = "Appointment Date")]
    pub date: String,
    #[serde(rename = "Appointment Time")]
    pub time: String,
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Booking Source")]
    pub booking_source: String,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Call ID", skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(rename = "Created At")]
    pub created_at: String,
}

impl AppointmentFields {
    pub fn confirmed(request: &BookingRequest, created_at: String) -> Self {
        Self {
            patient_name: request.patient_name.clone(),
            patient_phone: request.patient_phone.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
            duration: request.duration,
            status: STATUS_CONFIRMED.to_string(),
            booking_source: BOOKING_SOURCE_AI.to_string(),
            reason: request
                .reason
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASON.to_string()),
            call_id: request.call_id.clone(),
            created_at,
        }
    }
}

/// Fields written to a slot when it is claimed.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReservation {
    #[serde(rename = "Booked")]
    pub booked: bool,
    #[serde(rename = "Booked By")]
    pub booked_by: String,
    #[serde(rename = "Booked At")]
    pub booked_at: String,
}

// ==============================================================================
// RESPONSES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSlot {
    pub date: Option<String>,
    pub time: Option<String>,
    pub slot_id: String,
}

impl From<&Record> for AlternativeSlot {
    fn from(record: &Record) -> Self {
        Self {
            date: record.field_str(slot_fields::DATE).map(str::to_string),
            time: record.field_str(slot_fields::TIME).map(str::to_string),
            slot_id: record.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvailabilityResponse {
    Available {
        available: bool,
        #[serde(rename = "slotId")]
        slot_id: String,
        date: String,
        time: String,
        duration: i64,
    },
    Unavailable {
        available: bool,
        message: String,
        alternatives: Vec<AlternativeSlot>,
    },
}

impl AvailabilityResponse {
    pub fn available(slot_id: String, request: &AvailabilityCheckRequest) -> Self {
        AvailabilityResponse::Available {
            available: true,
            slot_id,
            date: request.date.clone(),
            time: request.time.clone(),
            duration: request.duration,
        }
    }

    pub fn unavailable(mut alternatives: Vec<AlternativeSlot>) -> Self {
        alternatives.truncate(MAX_ALTERNATIVES);
        AvailabilityResponse::Unavailable {
            available: false,
            message: "Slot not available".to_string(),
            alternatives,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AvailabilityResponse::Available { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    #[serde(rename = "appointmentId")]
    pub appointment_id: String,
    pub date: String,
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slot_id: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: i64,
}

impl From<&Record> for SlotSummary {
    fn from(record: &Record) -> Self {
        Self {
            slot_id: record.id.clone(),
            date: record.field_str(slot_fields::DATE).map(str::to_string),
            time: record.field_str(slot_fields::TIME).map(str::to_string),
            duration: record
                .field_i64(slot_fields::DURATION)
                .unwrap_or(DEFAULT_DURATION_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub count: usize,
    pub slots: Vec<SlotSummary>,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_appointments: usize,
    pub today_appointments: usize,
    pub ai_booked_appointments: usize,
    pub available_slots: usize,
    pub status: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_defaults_to_thirty() {
        let request: AvailabilityCheckRequest =
            serde_json::from_value(json!({ "date": "2024-01-05", "time": "10:00" })).unwrap();
        assert_eq!(request.duration, 30);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_booking_validation() {
        let mut request: BookingRequest = serde_json::from_value(json!({
            "date": "2024-01-05",
            "time": "10:00",
            "patient_name": "Jane Doe",
            "patient_phone": "+15550001111"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        request.patient_phone = " ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_slots_query_rejects_inverted_range() {
        let query = SlotsQuery {
            start_date: Some("2024-02-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            limit: None,
        };
        assert!(query.validate().is_err());

        let bad_limit = SlotsQuery { limit: Some(0), ..SlotsQuery::default() };
        assert!(bad_limit.validate().is_err());
    }

    #[test]
    fn test_appointment_fields_serialize_with_store_names() {
        let request = BookingRequest {
            date: "2024-01-05".to_string(),
            time: "10:00".to_string(),
            patient_name: "Jane Doe".to_string(),
            patient_phone: "+15550001111".to_string(),
            duration: 30,
            reason: None,
            call_id: None,
        };
        let fields = AppointmentFields::confirmed(&request, "2024-01-01T09:00:00+00:00".to_string());
        let value = serde_json::to_value(&fields).unwrap();

        assert_eq!(value["Status"], "Confirmed");
        assert_eq!(value["Booking Source"], "AI Receptionist");
        assert_eq!(value["Reason"], "General checkup");
        assert!(value.get("Call ID").is_none());
    }

    #[test]
    fn test_availability_response_shapes() {
        let request = AvailabilityCheckRequest {
            date: "2024-01-05".to_string(),
            time: "10:00".to_string(),
            duration: 45,
        };
        let available = serde_json::to_value(AvailabilityResponse::available("recA".to_string(), &request)).unwrap();
        assert_eq!(
            available,
            json!({ "available": true, "slotId": "recA", "date": "2024-01-05", "time": "10:00", "duration": 45 })
        );

        let alternatives: Vec<AlternativeSlot> = (0..8)
            .map(|i| AlternativeSlot {
                date: Some("2024-01-06".to_string()),
                time: Some(format!("{:02}:00", 9 + i)),
                slot_id: format!("rec{}", i),
            })
            .collect();
        let unavailable = AvailabilityResponse::unavailable(alternatives);
        assert!(!unavailable.is_available());

        let value = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(value["available"], false);
        assert_eq!(value["message"], "Slot not available");
        assert_eq!(value["alternatives"].as_array().unwrap().len(), MAX_ALTERNATIVES);
    }

    #[test]
    fn test_slot_summary_defaults_duration() {
        let record: Record = serde_json::from_value(json!({
            "id": "recS", "fields": { "Date": "2024-01-05", "Time": "10:00" }
        }))
        .unwrap();
        let summary = SlotSummary::from(&record);
        assert_eq!(summary.duration, 30);
        assert_eq!(summary.slot_id, "recS");
    }
}
