// libs/call-cell/src/services/vapi.rs
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{CallPlatformMessage, CallRelayError};

/// Client for pushing messages into an in-progress Vapi call.
pub struct VapiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl VapiClient {
    pub fn new(config: &AppConfig) -> Result<Self, CallRelayError> {
        let client = Client::builder().timeout(config.vapi_timeout()).build()?;

        Ok(Self {
            client,
            api_key: config.vapi_api_key.clone(),
            base_url: config.vapi_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST {base_url}/call/{call_id}/message
    fn message_url(&self, call_id: &str) -> Result<Url, CallRelayError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| CallRelayError::Request {
            message: format!("invalid Vapi base URL '{}': {}", self.base_url, e),
        })?;

        url.path_segments_mut()
            .map_err(|_| CallRelayError::Request {
                message: format!("Vapi base URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .push("call")
            .push(call_id)
            .push("message");

        Ok(url)
    }

    /// Sends `message` and `function_result` to the call, returning the
    /// platform's response body. Anything but a 200 is an API error.
    pub async fn send_message(
        &self,
        call_id: &str,
        message: &str,
        function_result: &Map<String, Value>,
    ) -> Result<Value, CallRelayError> {
        info!("Sending message to Vapi call: {}", call_id);

        let url = self.message_url(call_id)?;
        debug!("Sending relay request to: {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&CallPlatformMessage {
                message,
                function_result,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Error sending to Vapi: {}", e);
                CallRelayError::from(e)
            })?;

        let status = response.status();
        let response_text = response.text().await?;

        if status != StatusCode::OK {
            error!("Vapi API error: {} - {}", status, response_text);
            return Err(CallRelayError::Api {
                status,
                body: response_text,
            });
        }

        info!("Successfully sent message to Vapi");

        let body = if response_text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response_text).unwrap_or(Value::String(response_text))
        };

        Ok(body)
    }
}
