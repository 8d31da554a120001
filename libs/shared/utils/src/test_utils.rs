use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub airtable_url: String,
    pub vapi_url: String,
    pub airtable_api_key: String,
    pub vapi_api_key: String,
    pub base_id: String,
    pub timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            airtable_url: "http://localhost:54321/v0".to_string(),
            vapi_url: "http://localhost:54322".to_string(),
            airtable_api_key: "test-airtable-key".to_string(),
            vapi_api_key: "test-vapi-key".to_string(),
            base_id: "appTEST".to_string(),
            timeout_secs: 5,
        }
    }
}

impl TestConfig {
    /// Points both upstreams at a single mock server.
    pub fn with_mock_uri(uri: &str) -> Self {
        Self {
            airtable_url: format!("{}/v0", uri),
            vapi_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            airtable_api_key: self.airtable_api_key.clone(),
            airtable_base_id: self.base_id.clone(),
            airtable_api_url: self.airtable_url.clone(),
            appointments_table: "Appointments".to_string(),
            slots_table: "Available Slots".to_string(),
            logs_table: "Call Logs".to_string(),
            airtable_timeout_secs: self.timeout_secs,
            vapi_api_key: self.vapi_api_key.clone(),
            vapi_base_url: self.vapi_url.clone(),
            vapi_timeout_secs: self.timeout_secs,
            alternative_slots_window_days: 7,
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// URL paths of the three tables under the test base, as the mock server sees them.
pub struct TablePaths;

impl TablePaths {
    pub const SLOTS: &'static str = "/v0/appTEST/Available%20Slots";
    pub const APPOINTMENTS: &'static str = "/v0/appTEST/Appointments";
    pub const CALL_LOGS: &'static str = "/v0/appTEST/Call%20Logs";
}

pub struct MockAirtableResponses;

impl MockAirtableResponses {
    pub fn record_id() -> String {
        format!("rec{}", &Uuid::new_v4().simple().to_string()[..14])
    }

    pub fn slot_record(id: &str, date: &str, time: &str) -> Value {
        json!({
            "id": id,
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": {
                "Date": date,
                "Time": time,
                "Duration": 30
            }
        })
    }

    pub fn booked_slot_record(id: &str, date: &str, time: &str, phone: &str) -> Value {
        json!({
            "id": id,
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": {
                "Date": date,
                "Time": time,
                "Duration": 30,
                "Booked": true,
                "Booked By": phone,
                "Booked At": "2024-01-01T09:00:00"
            }
        })
    }

    pub fn appointment_record(id: &str, patient_name: &str, date: &str, time: &str) -> Value {
        json!({
            "id": id,
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": {
                "Patient Name": patient_name,
                "Patient Phone": "+15550001111",
                "Appointment Date": date,
                "Appointment Time": time,
                "Duration": 30,
                "Status": "Confirmed",
                "Booking Source": "AI Receptionist",
                "Reason": "General checkup"
            }
        })
    }

    pub fn call_log_record(id: &str, call_id: &str) -> Value {
        json!({
            "id": id,
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": {
                "Call ID": call_id,
                "Status": "Completed"
            }
        })
    }

    pub fn list(records: Vec<Value>) -> Value {
        json!({ "records": records })
    }

    pub fn empty_list() -> Value {
        json!({ "records": [] })
    }

    pub fn deleted(id: &str) -> Value {
        json!({ "id": id, "deleted": true })
    }

    pub fn error_response(error_type: &str, message: &str) -> Value {
        json!({
            "error": {
                "type": error_type,
                "message": message
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_mock_uri("http://127.0.0.1:9999");
        let app_config = config.to_app_config();

        assert_eq!(app_config.airtable_api_url, "http://127.0.0.1:9999/v0");
        assert_eq!(app_config.vapi_base_url, "http://127.0.0.1:9999");
        assert!(app_config.is_configured());
        assert!(app_config.is_call_platform_configured());
    }

    #[test]
    fn test_record_ids_look_like_airtable_ids() {
        let id = MockAirtableResponses::record_id();
        assert!(id.starts_with("rec"));
        assert_eq!(id.len(), 17);
    }
}
