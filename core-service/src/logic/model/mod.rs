//! Model Module - AI/ML Inference Engine
//!
//! Tách logic inference khỏi form handling.
//! The pipeline only sees the [`InferenceEngine`] trait, so the ONNX engine
//! can be swapped for another backend or an in-memory double.

pub mod inference;
pub mod onnx;

// Re-export common types
pub use inference::{InferenceEngine, ModelError, ModelMetadata, RawOutput, reduce_output};
pub use onnx::{OnnxModel, InputBinding, InputData, PlannedInput, plan_inputs, resolve_binding};
