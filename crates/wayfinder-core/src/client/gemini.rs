//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ModelClient;
use crate::{
    config::AssistantConfig,
    error::{AssistantError, Result},
    prompts::GenerationRequest,
};

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Client for Google's Generative Language API.
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    max_retries: u32,
    http: Client,
}

impl GeminiClient {
    /// Create a client from resolved configuration and an API key.
    pub fn from_config(config: &AssistantConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AssistantError::request("Could not build HTTP client").with_source(e))?;

        Ok(Self {
            model: config.model.clone(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the API
    fn build_request_body(request: &GenerationRequest) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
            }
        })
    }

    /// Pull the text payload out of a raw API answer.
    fn parse_response(body: &str) -> Result<String> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| AssistantError::malformed(format!("Unexpected response body: {e}")))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::malformed("Response has no candidates"))?;

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(AssistantError::malformed(format!(
                "Response carries no text (finish reason: {reason})"
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        debug!("generate: kind={} model={}", request.kind.as_str(), self.model);
        let url = self.endpoint();
        let body = Self::build_request_body(request);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!("generate: retrying in {backoff}ms (attempt {attempt})");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!("generate: network error on attempt {attempt}: {e}");
                    last_error = Some(AssistantError::request("Could not reach the model").with_source(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                debug!("generate: retryable status {status}");
                last_error = Some(AssistantError::request(format!("HTTP {status}: {text}")).build());
                continue;
            }

            let text = response
                .text()
                .await
                .map_err(|e| AssistantError::request("Could not read response body").with_source(e))?;
            if !(200..300).contains(&status) {
                return Err(AssistantError::request(format!("HTTP {status}: {text}")).build());
            }

            debug!("generate: success");
            return Self::parse_response(&text);
        }

        Err(last_error.unwrap_or_else(|| AssistantError::request("Max retries exceeded").build()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}
