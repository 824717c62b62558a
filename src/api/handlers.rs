use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{DayResult, GenerateRequest, HealthResponse};
use crate::api::AppState;
use crate::orchestrator::generate_reports;

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Vec<DayResult>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
    request.validate().map_err(ApiError::Validation)?;

    // Read per request so a rotated key takes effect without a restart.
    let api_key = state.config.api_key()?;
    let generator = state.generators.with_api_key(api_key);

    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("generate", request_id = %request_id);
    let results = generate_reports(generator.as_ref(), &state.config.generation, &request)
        .instrument(span)
        .await;

    Ok(Json(results))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
