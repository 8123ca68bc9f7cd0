//! Error taxonomy for the prediction pipeline
//!
//! Only [`CoreError::Startup`] is fatal. Every other variant belongs to a
//! single request and must be turned into a user-visible message by the
//! caller while the process keeps serving.

use serde::Serialize;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Hint attached to schema mismatch messages
pub const SCHEMA_HINT: &str =
    "check that feature names, order and types match the schema the model was trained on";

#[derive(Debug, Error)]
pub enum CoreError {
    /// Model artifact missing or undeserializable
    #[error("failed to load model artifact '{path}': {reason}")]
    Startup { path: String, reason: String },

    /// A submitted value violates its domain
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The model rejected the record's names, order or types
    #[error("feature schema mismatch: {detail} ({})", SCHEMA_HINT)]
    SchemaMismatch { detail: String },

    /// Any other failure during the model call or while reading its output
    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl CoreError {
    /// Whether the error must stop the process from serving
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Startup { .. })
    }

    /// Short machine-readable kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Startup { .. } => "startup_error",
            CoreError::Validation(_) => "validation_error",
            CoreError::SchemaMismatch { .. } => "schema_mismatch",
            CoreError::Prediction(_) => "prediction_error",
        }
    }
}

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// All violations found in one submission, in feature layout order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                reason: reason.into(),
            }],
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}
