//! Groq chat-completions backend (OpenAI-compatible wire format).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::redact::redact_error_message;
use super::{GeneratorFactory, ProviderError, TextGenerator};

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, PartialEq)]
pub struct GroqParams {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GroqParams {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    params: GroqParams,
    api_key: String,
}

impl GroqClient {
    pub fn new(http: reqwest::Client, params: GroqParams, api_key: String) -> Self {
        Self {
            http,
            params,
            api_key,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.params.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(
            model = %self.params.model,
            prompt_len = prompt.len(),
            "sending chat completion"
        );

        let response = self
            .http
            .post(&self.params.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(redact_error_message(&e.to_string())))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                message: error_message(response, status).await,
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(response, status).await,
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::Transport(format!(
                "ungültige Antwort: {}",
                redact_error_message(&e.to_string())
            ))
        })?;

        extract_content(body)
    }
}

/// Shares one connection pool across requests; only the key changes.
#[derive(Clone)]
pub struct GroqFactory {
    http: reqwest::Client,
    params: GroqParams,
}

impl GroqFactory {
    pub fn new(http: reqwest::Client, params: GroqParams) -> Self {
        Self { http, params }
    }
}

impl GeneratorFactory for GroqFactory {
    fn with_api_key(&self, api_key: String) -> Arc<dyn TextGenerator> {
        Arc::new(GroqClient::new(
            self.http.clone(),
            self.params.clone(),
            api_key,
        ))
    }
}

/// Prefer the provider's own `error.message`, fall back to the status.
async fn error_message(response: Response, status: StatusCode) -> String {
    response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .map(|message| redact_error_message(&message))
        .unwrap_or_else(|| format!("API error with status {}", status.as_u16()))
}

fn extract_content(body: ChatResponse) -> Result<String, ProviderError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(ProviderError::MissingContent)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}
