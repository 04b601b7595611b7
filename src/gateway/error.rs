use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::cascade::AnalyzeError;

/// Errors returned over HTTP as `{"error": "..."}` bodies.
#[derive(Debug)]
pub enum ApiError {
    /// 400: the request carried no analyzable text.
    NoText,
    /// 500: the analysis task failed to run.
    Internal,
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        match e {
            AnalyzeError::NoText => ApiError::NoText,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NoText => (StatusCode::BAD_REQUEST, "No text provided"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
