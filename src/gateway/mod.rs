//! HTTP gateway.
//!
//! Three routes: `POST /api/check` runs an analysis, `GET /healthz` is a
//! liveness probe, `GET /ready` reports which cascade layers this process
//! can serve. Analysis is CPU-bound and runs on the blocking pool so the
//! async workers stay responsive.

mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::cascade::{AnalysisMode, AnalysisReport, Analyzer};
use crate::context::ServiceContext;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub context: Arc<ServiceContext>,
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/ready", get(ready))
        .route("/api/check", post(check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: String,
    /// Defaults to deep analysis when omitted.
    #[serde(default)]
    pub mode: Option<AnalysisMode>,
}

async fn check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let analyzer = state.analyzer.clone();
    let mode = request.mode.unwrap_or_default();
    let text = request.text;

    let report = tokio::task::spawn_blocking(move || analyzer.analyze(&text, mode))
        .await
        .map_err(|e| {
            error!(error = %e, "Analysis task panicked or was cancelled");
            ApiError::Internal
        })??;

    Ok(Json(report))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn ready(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ready": true,
        "layers": state.context.availability,
        "corpus_sentences": state.context.corpus.len(),
    }))
}
