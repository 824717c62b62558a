pub mod groq;
pub mod redact;
pub mod retry;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use groq::{GroqClient, GroqFactory, GroqParams};
pub use retry::{with_backoff, RetryPolicy};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// HTTP 429. The only retryable failure.
    #[error("{message}")]
    RateLimited { message: String },

    /// Any other non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx without `choices[0].message.content`.
    #[error("Keine gültige Antwort von der API erhalten")]
    MissingContent,

    #[error("Verbindung zur API fehlgeschlagen: {0}")]
    Transport(String),

    #[error("Zeitüberschreitung nach {} s", duration.as_secs())]
    Timeout { duration: Duration },
}

impl ProviderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }
}

/// A text-completion provider. One call to `complete` is one upstream request.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Builds a generator bound to the credential read for the current request.
pub trait GeneratorFactory: Send + Sync {
    fn with_api_key(&self, api_key: String) -> Arc<dyn TextGenerator>;
}
