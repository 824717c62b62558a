//! HTTP client for the `/generate` endpoint, used by the wizard CLI.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{DayResult, GenerateRequest};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/generate";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ReportClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<Vec<DayResult>, ClientError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
            return Err(ClientError::Server { status, message });
        }

        Ok(response.json().await?)
    }
}
