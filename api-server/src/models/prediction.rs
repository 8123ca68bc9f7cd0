//! Prediction request/response models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use energy_core::{FeatureRecord, Prediction, PredictionResult, Presentation};

/// Predict response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// The typed row that was sent to the model
    pub record: FeatureRecord,
    pub result: PredictionResult,
    pub presentation: Presentation,
    pub inference_time_us: u64,
}

impl PredictResponse {
    pub fn new(prediction: Prediction) -> Self {
        let presentation = energy_core::render(&prediction.result);
        Self {
            prediction_id: Uuid::new_v4(),
            created_at: Utc::now(),
            record: prediction.record,
            result: prediction.result,
            presentation,
            inference_time_us: prediction.inference_time_us,
        }
    }
}
