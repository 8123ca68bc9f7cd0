//! Energy Load Core
//!
//! Turns eight building-design parameters into a heating/cooling load
//! prediction from a pre-trained regression model.
//!
//! ```text
//! RawInputs ──► FeatureAdapter ──► FeatureRecord ──► InferenceEngine
//!                                                        │
//!   Presentation ◄── render ◄── PredictionResult ◄── interpret
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, CoreResult, FieldViolation, ValidationError, SCHEMA_HINT};
pub use logic::features::{FeatureAdapter, FeatureRecord, LayoutInfo, RawInputs};
pub use logic::model::{InferenceEngine, ModelError, ModelMetadata, OnnxModel, RawOutput};
pub use logic::pipeline::{EngineConfig, EngineStatus, Prediction, Predictor};
pub use logic::prediction::{interpret, render, PredictionResult, Presentation};
