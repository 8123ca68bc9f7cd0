//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use energy_core::RawInputs;

use crate::{AppResult, AppState};
use crate::models::PredictResponse;

/// Run one prediction for the submitted form values
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<RawInputs>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(inputs) = body?;

    let predictor = state.predictor.clone();
    let prediction = tokio::task::spawn_blocking(move || predictor.predict(&inputs)).await??;

    let response = PredictResponse::new(prediction);
    tracing::info!(
        "Prediction {} served in {}us",
        response.prediction_id,
        response.inference_time_us
    );

    Ok(Json(response))
}
