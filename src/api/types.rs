use serde::{Deserialize, Serialize};

pub use crate::model::report::{DayResult, GenerateRequest};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
