//! Inference Engine - model contract and raw output shapes
//!
//! Engines receive a validated [`FeatureRecord`] and return the model's raw
//! answer for that single row. What the answer *means* is decided later by
//! the formatter; engines only report its shape faithfully.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::FeatureRecord;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// The model's output for one submitted row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawOutput {
    Scalar(f64),
    Sequence(Vec<f64>),
    /// Row of rank ≥ 2, values in row-major order
    Tensor { shape: Vec<usize>, values: Vec<f64> },
    /// Non-numeric output, carried verbatim
    Text(String),
}

impl fmt::Display for RawOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawOutput::Scalar(v) => write!(f, "{}", v),
            RawOutput::Sequence(values) => write!(f, "{:?}", values),
            RawOutput::Tensor { shape, values } => {
                write!(f, "tensor(shape={:?}, values={:?})", shape, values)
            }
            RawOutput::Text(text) => f.write_str(text),
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub format: String,
    /// How the record is fed to the model ("packed" or "columns")
    pub binding: String,
    pub inputs: Vec<String>,
    pub output: String,
    /// SHA-256 of the artifact, hex encoded
    pub checksum: Option<String>,
    pub layout_hash: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The model does not accept the record's names, order or types
    #[error("{0}")]
    SchemaMismatch(String),

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Trait cho inference engines (ONNX, in-memory test doubles, ...)
///
/// Loaded once at startup and shared read-only between requests.
pub trait InferenceEngine: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<RawOutput, ModelError>;
    fn metadata(&self) -> &ModelMetadata;
}

// ============================================================================
// OUTPUT REDUCTION
// ============================================================================

/// Reduce a batch-major output tensor to the answer for row 0
///
/// The batch dimension is dropped and singleton dimensions inside the row
/// are squeezed, so `[1]` and `[1, 1]` yield a scalar and `[1, 2]` a pair.
pub fn reduce_output(shape: &[i64], values: Vec<f64>) -> Result<RawOutput, ModelError> {
    if let Some(d) = shape.iter().find(|&&d| d < 0) {
        return Err(ModelError::MalformedOutput(format!("negative dimension {} in {:?}", d, shape)));
    }
    let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();

    let total: usize = dims.iter().product();
    if total != values.len() {
        return Err(ModelError::MalformedOutput(format!(
            "shape {:?} holds {} values, got {}",
            dims,
            total,
            values.len()
        )));
    }

    let Some((&batch, row_dims)) = dims.split_first() else {
        return Ok(RawOutput::Scalar(values[0]));
    };
    if batch == 0 {
        return Err(ModelError::MalformedOutput("empty batch".to_string()));
    }

    let row_len: usize = row_dims.iter().product();
    let mut row = values;
    row.truncate(row_len);

    let squeezed: Vec<usize> = row_dims.iter().copied().filter(|&d| d != 1).collect();
    Ok(match squeezed.len() {
        0 => RawOutput::Scalar(row[0]),
        1 => RawOutput::Sequence(row),
        _ => RawOutput::Tensor { shape: squeezed, values: row },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_single_target() {
        assert_eq!(reduce_output(&[1], vec![18.9]).unwrap(), RawOutput::Scalar(18.9));
        assert_eq!(reduce_output(&[1, 1], vec![18.9]).unwrap(), RawOutput::Scalar(18.9));
        assert_eq!(reduce_output(&[], vec![18.9]).unwrap(), RawOutput::Scalar(18.9));
    }

    #[test]
    fn test_reduce_dual_target() {
        assert_eq!(
            reduce_output(&[1, 2], vec![21.34, 24.58]).unwrap(),
            RawOutput::Sequence(vec![21.34, 24.58])
        );
    }

    #[test]
    fn test_reduce_takes_first_row() {
        assert_eq!(
            reduce_output(&[2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
            RawOutput::Sequence(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_reduce_higher_rank_row() {
        let out = reduce_output(&[1, 2, 3], (0..6).map(f64::from).collect()).unwrap();
        assert_eq!(
            out,
            RawOutput::Tensor { shape: vec![2, 3], values: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0] }
        );
    }

    #[test]
    fn test_reduce_malformed() {
        assert!(matches!(
            reduce_output(&[1, 2], vec![1.0]),
            Err(ModelError::MalformedOutput(_))
        ));
        assert!(matches!(
            reduce_output(&[0, 2], vec![]),
            Err(ModelError::MalformedOutput(_))
        ));
        assert!(matches!(
            reduce_output(&[-1], vec![1.0]),
            Err(ModelError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_display_verbatim() {
        assert_eq!(RawOutput::Scalar(18.9).to_string(), "18.9");
        assert_eq!(RawOutput::Sequence(vec![1.0, 2.5, 3.0]).to_string(), "[1.0, 2.5, 3.0]");
        assert_eq!(RawOutput::Text("high".into()).to_string(), "high");
    }
}
