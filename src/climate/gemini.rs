//! Gemini `generateContent` transport
//!
//! Blocking client with a finite timeout and no retries. The API key and the
//! client are owned by the transport instance; nothing is process-global.

use super::remote::{scenario_prompt, ScenarioTransport};
use crate::error::TransportError;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}:generateContent", API_BASE, model),
            api_key: api_key.into(),
        })
    }

    /// Point the transport at a different endpoint (proxies, test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl ScenarioTransport for GeminiTransport {
    fn fetch(&self, description: &str, day_count: usize) -> Result<String, TransportError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": scenario_prompt(description, day_count) }] }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .map_err(|e| TransportError::Payload(e.to_string()))?;

        extract_text(&payload)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
fn extract_text(payload: &Value) -> Result<String, TransportError> {
    let text = payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| TransportError::Payload("no candidate text in response".to_string()))?;
    Ok(strip_code_fence(text).to_string())
}

/// Models often wrap CSV in a ```csv fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.split_once('\n').map_or("", |(_, body)| body);
            body.trim_end().strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}
