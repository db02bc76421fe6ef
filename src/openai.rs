//! OpenAI-compatible chat completion client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use youthplan_core::completion::{ChatMessage, CompletionProvider, CompletionRequest};
use youthplan_core::config::{API_KEY_ENV, PlannerConfig};
use youthplan_core::{PlannerError, PlannerResult};

const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Build a client from the config, with the key from the environment.
    pub fn from_config(config: &PlannerConfig) -> PlannerResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PlannerError::CompletionUnavailable(format!(
                    "set the {} environment variable to use AI features",
                    API_KEY_ENV
                ))
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlannerError::Completion(e.to_string()))?;

        Ok(OpenAiClient {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl CompletionProvider for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> PlannerResult<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_response.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(model = %request.model, max_tokens = ?request.max_tokens, "Sending completion request");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::Completion(format!("Failed to reach {}: {}", self.base_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(PlannerError::Completion(format!("{}: {}", status, message)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::Completion(format!("Unreadable response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PlannerError::Completion("Response contained no message".into()))
    }
}
