use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::ServerConfig;
use crate::inference::GeneratorFactory;

pub mod error;
pub mod handlers;
pub mod types;

pub use error::ApiError;

use handlers::{generate, health, method_not_allowed};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub generators: Arc<dyn GeneratorFactory>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate).fallback(method_not_allowed))
        // Alias to match FE
        .route(
            "/.netlify/functions/generate",
            post(generate).fallback(method_not_allowed),
        )
        .route("/health", get(health))
}
