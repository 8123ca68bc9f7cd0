//! Prediction Pipeline
//!
//! raw inputs → FeatureAdapter → InferenceEngine → interpret
//!
//! One call per explicit user action. The engine is shared read-only; the
//! only mutable state here is the latency/count statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{CoreError, CoreResult};
use crate::logic::features::{FeatureAdapter, FeatureRecord, RawInputs};
use crate::logic::model::{InferenceEngine, ModelError, ModelMetadata, OnnxModel};
use crate::logic::prediction::{interpret, PredictionResult};

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub model_path: String,
    pub intra_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: constants::DEFAULT_MODEL_PATH.to_string(),
            intra_threads: constants::DEFAULT_INTRA_THREADS,
        }
    }
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Engine Status for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub inference_count: u64,
    pub failure_count: u64,
    pub avg_latency_ms: f32,
}

/// A completed prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub record: FeatureRecord,
    pub result: PredictionResult,
    pub inference_time_us: u64,
}

// ============================================================================
// PREDICTOR
// ============================================================================

pub struct Predictor {
    engine: Arc<dyn InferenceEngine>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    failure_count: AtomicU64,
}

impl Predictor {
    pub fn new(engine: Arc<dyn InferenceEngine>) -> Self {
        Self {
            engine,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    /// One-time startup load. Any error here is fatal.
    pub fn load(config: &EngineConfig) -> CoreResult<Self> {
        let model = OnnxModel::load(&config.model_path, config.intra_threads)?;
        Ok(Self::new(Arc::new(model)))
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.engine.metadata()
    }

    /// Validate, predict and interpret one submission
    pub fn predict(&self, inputs: &RawInputs) -> CoreResult<Prediction> {
        let record = FeatureAdapter::build(inputs)?;

        let start_time = Instant::now();
        let outcome = self.engine.predict(&record);
        let inference_time_us = start_time.elapsed().as_micros() as u64;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                log::warn!("Model call failed: {}", e);
                return Err(match e {
                    ModelError::SchemaMismatch(detail) => CoreError::SchemaMismatch { detail },
                    other => CoreError::Prediction(other.to_string()),
                });
            }
        };

        let result = interpret(&raw).inspect_err(|_| {
            self.failure_count.fetch_add(1, Ordering::Relaxed);
        })?;

        // Only interpretable answers count towards the average
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if let PredictionResult::Unrecognized { raw } = &result {
            log::info!("Model returned an unrecognized output shape: {}", raw);
        }
        log::debug!("Prediction done in {}us: {:?}", inference_time_us, result);

        Ok(Prediction {
            record,
            result,
            inference_time_us,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            inference_count: count,
            failure_count: self.failure_count.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}
