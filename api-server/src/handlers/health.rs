//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use energy_core::constants::APP_VERSION;
use energy_core::{EngineStatus, LayoutInfo, ModelMetadata};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    model: ModelMetadata,
    engine: EngineStatus,
    layout: LayoutInfo,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        model: state.predictor.metadata().clone(),
        engine: state.predictor.status(),
        layout: LayoutInfo::current(),
    })
}
