use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::inference::{GroqParams, RetryPolicy};
use crate::orchestrator::GenerationPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not set in environment variables. Please add it to your deployment settings.")]
    MissingApiKey { var: String },

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Name of the variable holding the provider key; read per request.
    pub api_key_env: String,
    pub provider: GroqParams,
    pub generation: GenerationPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            provider: GroqParams::default(),
            generation: GenerationPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the process environment (and `.env` if `dotenvy` loaded one).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let provider = GroqParams {
            api_url: string_var("GROQ_API_URL", &defaults.provider.api_url),
            model: string_var("GROQ_MODEL", &defaults.provider.model),
            temperature: parse_var("GROQ_TEMPERATURE", defaults.provider.temperature)?,
            max_tokens: parse_var("GROQ_MAX_TOKENS", defaults.provider.max_tokens)?,
        };

        let generation = GenerationPolicy {
            retry: RetryPolicy {
                max_retries: parse_var("GROQ_MAX_RETRIES", defaults.generation.retry.max_retries)?,
                initial_delay: Duration::from_millis(parse_var(
                    "GROQ_RETRY_DELAY_MS",
                    defaults.generation.retry.initial_delay.as_millis() as u64,
                )?),
            },
            call_timeout: Duration::from_secs(parse_var(
                "GROQ_TIMEOUT_SECS",
                defaults.generation.call_timeout.as_secs(),
            )?),
        };

        Ok(Self {
            bind_addr: string_var("BIND_ADDR", &defaults.bind_addr),
            api_key_env: string_var("GROQ_API_KEY_ENV", &defaults.api_key_env),
            provider,
            generation,
        })
    }

    /// Provider credential for the current request. Blank counts as missing.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        dotenvy::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: self.api_key_env.clone(),
            })
    }
}

fn string_var(var: &str, default: &str) -> String {
    dotenvy::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match dotenvy::var(var) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: var.to_string(),
                    value: raw,
                })
        }
        _ => Ok(default),
    }
}
