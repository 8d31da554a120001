use std::env;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub airtable_api_key: String,
    pub airtable_base_id: String,
    pub airtable_api_url: String,
    pub appointments_table: String,
    pub slots_table: String,
    pub logs_table: String,
    pub airtable_timeout_secs: u64,
    pub vapi_api_key: String,
    pub vapi_base_url: String,
    pub vapi_timeout_secs: u64,
    pub alternative_slots_window_days: i64,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            airtable_api_key: env::var("AIRTABLE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("AIRTABLE_API_KEY not set, using empty value");
                    String::new()
                }),
            airtable_base_id: env::var("AIRTABLE_BASE_ID")
                .unwrap_or_else(|_| {
                    warn!("AIRTABLE_BASE_ID not set, using empty value");
                    String::new()
                }),
            airtable_api_url: env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| "https://api.airtable.com/v0".to_string()),
            appointments_table: env::var("AIRTABLE_APPOINTMENTS_TABLE")
                .unwrap_or_else(|_| "Appointments".to_string()),
            slots_table: env::var("AIRTABLE_SLOTS_TABLE")
                .unwrap_or_else(|_| "Available Slots".to_string()),
            logs_table: env::var("AIRTABLE_LOGS_TABLE")
                .unwrap_or_else(|_| "Call Logs".to_string()),
            airtable_timeout_secs: parse_or("AIRTABLE_TIMEOUT_SECS", 30),
            vapi_api_key: env::var("VAPI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("VAPI_API_KEY not set, using empty value");
                    String::new()
                }),
            vapi_base_url: env::var("VAPI_BASE_URL")
                .unwrap_or_else(|_| "https://api.vapi.ai".to_string()),
            vapi_timeout_secs: parse_or("VAPI_TIMEOUT_SECS", 30),
            alternative_slots_window_days: parse_or("ALTERNATIVE_SLOTS_WINDOW_DAYS", 7),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing Airtable credentials");
        }

        if !config.is_call_platform_configured() {
            warn!("Vapi API key missing - relaying messages to calls will fail");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.airtable_api_key.is_empty() && !self.airtable_base_id.is_empty()
    }

    pub fn is_call_platform_configured(&self) -> bool {
        !self.vapi_api_key.is_empty() && !self.vapi_base_url.is_empty()
    }

    pub fn airtable_timeout(&self) -> Duration {
        Duration::from_secs(self.airtable_timeout_secs)
    }

    pub fn vapi_timeout(&self) -> Duration {
        Duration::from_secs(self.vapi_timeout_secs)
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            airtable_api_key: "key".to_string(),
            airtable_base_id: "appBase".to_string(),
            airtable_api_url: "https://api.airtable.com/v0".to_string(),
            appointments_table: "Appointments".to_string(),
            slots_table: "Available Slots".to_string(),
            logs_table: "Call Logs".to_string(),
            airtable_timeout_secs: 30,
            vapi_api_key: String::new(),
            vapi_base_url: "https://api.vapi.ai".to_string(),
            vapi_timeout_secs: 30,
            alternative_slots_window_days: 7,
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_configured_flags() {
        let config = sample();
        assert!(config.is_configured());
        assert!(!config.is_call_platform_configured());

        let mut missing_base = sample();
        missing_base.airtable_base_id.clear();
        assert!(!missing_base.is_configured());
    }

    #[test]
    fn test_timeouts() {
        let config = sample();
        assert_eq!(config.airtable_timeout(), Duration::from_secs(30));
        assert_eq!(config.vapi_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_or_falls_back_on_missing_key() {
        let value: u64 = parse_or("RECEPTIONIST_TEST_UNSET_KEY", 42);
        assert_eq!(value, 42);
    }
}
