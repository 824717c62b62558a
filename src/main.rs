use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use berichtsheft::api::{self, AppState};
use berichtsheft::config::ServerConfig;
use berichtsheft::inference::GroqFactory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🚀 Starting Berichtsheft generator...");

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let config = ServerConfig::from_env()?;
    if config.api_key().is_err() {
        // Not fatal: the key is read per request and may be set later.
        tracing::warn!(var = %config.api_key_env, "provider key not set yet");
    }

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    let generators = Arc::new(GroqFactory::new(http, config.provider.clone()));

    info!(
        model = %config.provider.model,
        max_retries = config.generation.retry.max_retries,
        timeout_secs = config.generation.call_timeout.as_secs(),
        "provider configured"
    );

    let addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        generators,
    };

    // -----------------------------
    // Routers
    // -----------------------------
    let app = Router::new()
        .merge(api::router())
        // CORS for frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    println!("🌐 HTTP listening on http://{addr}");
    println!("🛠 Generate at http://{addr}/generate");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
