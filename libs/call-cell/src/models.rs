// libs/call-cell/src/models.rs
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use shared_models::error::AppError;
use shared_utils::validation::{require_non_blank, require_range, Validate};

pub const CALL_LOG_STATUS_COMPLETED: &str = "Completed";

// ==============================================================================
// CALL RELAY
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRelayRequest {
    pub call_sid: String,
    pub message: String,
    pub function_result: Map<String, Value>,
}

impl Validate for CallRelayRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("callSid", &self.call_sid)?;
        require_non_blank("message", &self.message)
    }
}

/// Body posted to the call platform's per-call message endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPlatformMessage<'a> {
    pub message: &'a str,
    pub function_result: &'a Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRelayResponse {
    pub status: String,
    pub vapi_response: Value,
}

impl CallRelayResponse {
    pub fn sent(vapi_response: Value) -> Self {
        Self {
            status: "sent".to_string(),
            vapi_response,
        }
    }
}

#[derive(Error, Debug)]
pub enum CallRelayError {
    #[error("Timeout connecting to Vapi")]
    Timeout,

    #[error("Vapi API error: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Vapi request failed: {message}")]
    Request { message: String },
}

impl From<reqwest::Error> for CallRelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallRelayError::Timeout
        } else {
            CallRelayError::Request {
                message: err.to_string(),
            }
        }
    }
}

impl From<CallRelayError> for AppError {
    fn from(err: CallRelayError) -> Self {
        match err {
            CallRelayError::Timeout => AppError::Timeout(err.to_string()),
            CallRelayError::Api { status, .. } => AppError::Upstream {
                status,
                message: err.to_string(),
            },
            CallRelayError::Request { .. } => AppError::Internal(err.to_string()),
        }
    }
}

// ==============================================================================
// CALL LOGGING
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogRequest {
    pub call_id: String,
    pub phone_number: String,
    pub transcript: String,
    pub outcome: String,
    pub duration: Option<i64>,
}

impl Validate for CallLogRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_blank("call_id", &self.call_id)?;
        require_non_blank("phone_number", &self.phone_number)?;
        require_non_blank("outcome", &self.outcome)?;
        if let Some(duration) = self.duration {
            require_range("duration", duration, 0, i64::from(u32::MAX))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogAck {
    pub status: String,
    pub call_id: String,
}

impl CallLogAck {
    pub fn logging(call_id: String) -> Self {
        Self {
            status: "logging".to_string(),
            call_id,
        }
    }
}

/// Fields written to the call log table.
#[derive(Debug, Clone, Serialize)]
pub struct CallLogFields {
    #[serde(rename = "Call ID")]
    pub call_id: String,
    #[serde(rename = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Transcript")]
    pub transcript: String,
    #[serde(rename = "Outcome")]
    pub outcome: String,
    #[serde(rename = "Duration (seconds)", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl CallLogFields {
    pub fn completed(entry: CallLogRequest, timestamp: String) -> Self {
        Self {
            call_id: entry.call_id,
            phone_number: entry.phone_number,
            transcript: entry.transcript,
            outcome: entry.outcome,
            duration_seconds: entry.duration,
            timestamp,
            status: CALL_LOG_STATUS_COMPLETED.to_string(),
        }
    }
}
