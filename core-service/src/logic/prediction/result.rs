//! Prediction Result - classify the model's raw output by shape

use serde::Serialize;

use crate::error::CoreError;
use crate::logic::model::RawOutput;

/// What the model predicted, in a form the display layer can rely on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionResult {
    /// Two-target model: heating and cooling load
    DualLoad { heating: f64, cooling: f64 },
    /// Single-target model
    SingleLoad { value: f64 },
    /// Any other shape; shown verbatim, not an error
    Unrecognized { raw: RawOutput },
}

/// Interpret the model's raw output
///
/// Pure: the same output always yields the same result. Only malformed
/// numeric output (non-finite values, a tensor whose values don't fill its
/// shape) is an error.
pub fn interpret(raw: &RawOutput) -> Result<PredictionResult, CoreError> {
    check_well_formed(raw)?;

    Ok(match raw {
        RawOutput::Sequence(values) if values.len() == 2 => PredictionResult::DualLoad {
            heating: values[0],
            cooling: values[1],
        },
        RawOutput::Scalar(value) => PredictionResult::SingleLoad { value: *value },
        other => PredictionResult::Unrecognized { raw: other.clone() },
    })
}

fn check_well_formed(raw: &RawOutput) -> Result<(), CoreError> {
    let values: &[f64] = match raw {
        RawOutput::Scalar(v) => std::slice::from_ref(v),
        RawOutput::Sequence(values) => values,
        RawOutput::Tensor { shape, values } => {
            let expected: usize = shape.iter().product();
            if expected != values.len() {
                return Err(CoreError::Prediction(format!(
                    "malformed model output: shape {:?} holds {} values, got {}",
                    shape,
                    expected,
                    values.len()
                )));
            }
            values
        }
        RawOutput::Text(_) => return Ok(()),
    };

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::Prediction(format!(
            "malformed model output: non-numeric value {}",
            bad
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_dual_load() {
        let result = interpret(&RawOutput::Sequence(vec![21.34, 24.58])).unwrap();
        assert_eq!(result, PredictionResult::DualLoad { heating: 21.34, cooling: 24.58 });
    }

    #[test]
    fn test_pair_keeps_full_precision() {
        let h = 12.345678901234567;
        let c = 0.1 + 0.2;
        match interpret(&RawOutput::Sequence(vec![h, c])).unwrap() {
            PredictionResult::DualLoad { heating, cooling } => {
                assert_eq!(heating.to_bits(), h.to_bits());
                assert_eq!(cooling.to_bits(), c.to_bits());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scalar_is_single_load() {
        for v in [18.9, 0.0, -3.25, 1e6] {
            assert_eq!(
                interpret(&RawOutput::Scalar(v)).unwrap(),
                PredictionResult::SingleLoad { value: v }
            );
        }
    }

    #[test]
    fn test_other_shapes_are_unrecognized() {
        let outputs = vec![
            RawOutput::Sequence(vec![1.0, 2.0, 3.0]),
            RawOutput::Sequence(vec![1.0]),
            RawOutput::Sequence(vec![]),
            RawOutput::Text("high".into()),
            RawOutput::Tensor { shape: vec![2, 2], values: vec![1.0, 2.0, 3.0, 4.0] },
        ];
        for raw in outputs {
            assert_eq!(
                interpret(&raw).unwrap(),
                PredictionResult::Unrecognized { raw: raw.clone() }
            );
        }
    }

    #[test]
    fn test_interpret_is_idempotent() {
        let outputs = vec![
            RawOutput::Sequence(vec![21.34, 24.58]),
            RawOutput::Scalar(18.9),
            RawOutput::Text("?".into()),
        ];
        for raw in outputs {
            assert_eq!(interpret(&raw).unwrap(), interpret(&raw).unwrap());
        }
    }

    #[test]
    fn test_malformed_output_is_error() {
        assert!(interpret(&RawOutput::Scalar(f64::NAN)).is_err());
        assert!(interpret(&RawOutput::Sequence(vec![1.0, f64::INFINITY])).is_err());
        let err = interpret(&RawOutput::Tensor { shape: vec![2, 2], values: vec![1.0] }).unwrap_err();
        assert_eq!(err.kind(), "prediction_error");
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_value(PredictionResult::SingleLoad { value: 18.9 }).unwrap();
        assert_eq!(json["kind"], "single_load");
        assert_eq!(json["value"], 18.9);
    }
}
