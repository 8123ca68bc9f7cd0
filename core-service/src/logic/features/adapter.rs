//! Feature Adapter - raw form values → typed FeatureRecord
//!
//! Presence is checked through `validator`; ranges, enumerated choices and
//! finiteness are checked against FEATURE_LAYOUT.
//! Integer columns are pinned to `i64` here: the model rejects a float where
//! it was trained on an integer, so the raw representation is never trusted.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::layout::{feature_index, FeatureKind, FEATURE_COUNT, FEATURE_LAYOUT};
use super::record::FeatureRecord;
use crate::error::{FieldViolation, ValidationError};

/// Raw values as submitted by the form, any of which may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RawInputs {
    #[serde(default, alias = "Relative_Compactness")]
    #[validate(required)]
    pub relative_compactness: Option<f64>,

    #[serde(default, alias = "Surface_Area")]
    #[validate(required)]
    pub surface_area: Option<f64>,

    #[serde(default, alias = "Wall_Area")]
    #[validate(required)]
    pub wall_area: Option<f64>,

    #[serde(default, alias = "Roof_Area")]
    #[validate(required)]
    pub roof_area: Option<f64>,

    #[serde(default, alias = "Overall_Height")]
    #[validate(required)]
    pub overall_height: Option<f64>,

    #[serde(default, alias = "Orientation")]
    #[validate(required)]
    pub orientation: Option<f64>,

    #[serde(default, alias = "Glazing_Area")]
    #[validate(required)]
    pub glazing_area: Option<f64>,

    #[serde(default, alias = "Glazing_Area_Distribution")]
    #[validate(required)]
    pub glazing_area_distribution: Option<f64>,
}

impl RawInputs {
    /// Initial state of the form
    pub fn defaults() -> Self {
        let d = FEATURE_LAYOUT.map(|spec| Some(spec.default));
        Self::from_values(d)
    }

    /// Values in FEATURE_LAYOUT order
    pub fn values(&self) -> [Option<f64>; FEATURE_COUNT] {
        [
            self.relative_compactness,
            self.surface_area,
            self.wall_area,
            self.roof_area,
            self.overall_height,
            self.orientation,
            self.glazing_area,
            self.glazing_area_distribution,
        ]
    }

    fn from_values(v: [Option<f64>; FEATURE_COUNT]) -> Self {
        Self {
            relative_compactness: v[0],
            surface_area: v[1],
            wall_area: v[2],
            roof_area: v[3],
            overall_height: v[4],
            orientation: v[5],
            glazing_area: v[6],
            glazing_area_distribution: v[7],
        }
    }
}

impl From<&FeatureRecord> for RawInputs {
    fn from(record: &FeatureRecord) -> Self {
        Self::from_values(record.to_f64_row().map(Some))
    }
}

/// Validates raw inputs and coerces them into the model's schema
pub struct FeatureAdapter;

impl FeatureAdapter {
    pub fn build(inputs: &RawInputs) -> Result<FeatureRecord, ValidationError> {
        let mut violations: Vec<(usize, FieldViolation)> = Vec::new();

        if let Err(errors) = inputs.validate() {
            for (field, errs) in errors.field_errors() {
                let name: &str = &field;
                let Some(index) = feature_index(name) else {
                    continue;
                };
                if !errs.is_empty() {
                    violations.push((index, violation(index, "is required")));
                }
            }
        }

        for (index, (spec, value)) in FEATURE_LAYOUT.iter().zip(inputs.values()).enumerate() {
            let Some(value) = value else { continue };
            if violations.iter().any(|(i, _)| *i == index) {
                continue;
            }
            if !value.is_finite() {
                violations.push((index, violation(index, "must be a finite number")));
            } else if !spec.domain.contains(value) {
                violations.push((index, violation(index, spec.domain.describe())));
            }
        }

        if !violations.is_empty() {
            violations.sort_by_key(|(i, _)| *i);
            return Err(ValidationError {
                violations: violations.into_iter().map(|(_, v)| v).collect(),
            });
        }

        let v = inputs.values();
        Ok(FeatureRecord {
            relative_compactness: float(&v, 0)?,
            surface_area: float(&v, 1)?,
            wall_area: float(&v, 2)?,
            roof_area: float(&v, 3)?,
            overall_height: float(&v, 4)?,
            orientation: integer(&v, 5)?,
            glazing_area: float(&v, 6)?,
            glazing_area_distribution: integer(&v, 7)?,
        })
    }
}

fn violation(index: usize, reason: impl Into<String>) -> FieldViolation {
    FieldViolation {
        field: FEATURE_LAYOUT[index].name.to_string(),
        reason: reason.into(),
    }
}

fn present(values: &[Option<f64>; FEATURE_COUNT], index: usize) -> Result<f64, ValidationError> {
    values[index].ok_or_else(|| ValidationError::single(FEATURE_LAYOUT[index].name, "is required"))
}

fn float(values: &[Option<f64>; FEATURE_COUNT], index: usize) -> Result<f64, ValidationError> {
    debug_assert_eq!(FEATURE_LAYOUT[index].kind, FeatureKind::Float);
    present(values, index)
}

fn integer(values: &[Option<f64>; FEATURE_COUNT], index: usize) -> Result<i64, ValidationError> {
    debug_assert_eq!(FEATURE_LAYOUT[index].kind, FeatureKind::Integer);
    let value = present(values, index)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::single(FEATURE_LAYOUT[index].name, "must be a whole number"));
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::{
        FeatureDomain, GLAZING_DISTRIBUTIONS, ORIENTATIONS, OVERALL_HEIGHTS,
    };

    fn reference_inputs() -> RawInputs {
        RawInputs {
            relative_compactness: Some(0.8),
            surface_area: Some(600.0),
            wall_area: Some(300.0),
            roof_area: Some(150.0),
            overall_height: Some(7.0),
            orientation: Some(3.0),
            glazing_area: Some(0.25),
            glazing_area_distribution: Some(2.0),
        }
    }

    #[test]
    fn test_build_reference_inputs() {
        let record = FeatureAdapter::build(&reference_inputs()).unwrap();
        assert_eq!(record.relative_compactness, 0.8);
        assert_eq!(record.surface_area, 600.0);
        assert_eq!(record.overall_height, 7.0);
        assert_eq!(record.orientation, 3);
        assert_eq!(record.glazing_area_distribution, 2);
    }

    #[test]
    fn test_build_every_enumerated_combination() {
        for &height in OVERALL_HEIGHTS {
            for &orientation in ORIENTATIONS {
                for &dist in GLAZING_DISTRIBUTIONS {
                    let inputs = RawInputs {
                        overall_height: Some(height),
                        orientation: Some(orientation as f64),
                        glazing_area_distribution: Some(dist as f64),
                        ..reference_inputs()
                    };
                    let record = FeatureAdapter::build(&inputs).unwrap();
                    assert_eq!(record.orientation, orientation);
                    assert_eq!(record.glazing_area_distribution, dist);
                }
            }
        }
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        for spec in FEATURE_LAYOUT.iter() {
            if let FeatureDomain::Range { min, max } = spec.domain {
                for edge in [min, max] {
                    let mut values = reference_inputs().values();
                    values[feature_index(spec.name).unwrap()] = Some(edge);
                    let inputs = RawInputs::from_values(values);
                    assert!(FeatureAdapter::build(&inputs).is_ok(), "{} at {}", spec.name, edge);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let inputs = RawInputs {
            relative_compactness: Some(1.2),
            glazing_area: Some(-0.1),
            ..reference_inputs()
        };
        let err = FeatureAdapter::build(&inputs).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec!["relative_compactness", "glazing_area"]
        );
        assert_eq!(err.violations[0].reason, "must be between 0.6 and 1");
    }

    #[test]
    fn test_ranges_come_from_layout() {
        for spec in FEATURE_LAYOUT.iter() {
            let FeatureDomain::Range { min, max } = spec.domain else { continue };
            for outside in [min - 0.01, max + 0.01] {
                let mut values = reference_inputs().values();
                values[feature_index(spec.name).unwrap()] = Some(outside);
                let inputs = RawInputs::from_values(values);

                assert!(inputs.validate().is_ok(), "derive only checks presence");
                let err = FeatureAdapter::build(&inputs).unwrap_err();
                assert_eq!(err.violations.len(), 1);
                assert_eq!(err.violations[0].field, spec.name);
                assert_eq!(err.violations[0].reason, spec.domain.describe());
            }
        }
    }

    #[test]
    fn test_missing_fields_reported_in_layout_order() {
        let inputs = RawInputs {
            glazing_area_distribution: None,
            surface_area: None,
            ..reference_inputs()
        };
        let err = FeatureAdapter::build(&inputs).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert_eq!(err.violations[0].field, "surface_area");
        assert_eq!(err.violations[0].reason, "is required");
        assert_eq!(err.violations[1].field, "glazing_area_distribution");
    }

    #[test]
    fn test_enumerated_values_rejected() {
        let inputs = RawInputs {
            overall_height: Some(5.0),
            orientation: Some(3.5),
            glazing_area_distribution: Some(6.0),
            ..reference_inputs()
        };
        let err = FeatureAdapter::build(&inputs).unwrap_err();
        let reasons: Vec<&str> = err.violations.iter().map(|v| v.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec![
                "must be one of 3.5, 7",
                "must be one of 2, 3, 4, 5",
                "must be one of 0, 1, 2, 3, 4, 5",
            ]
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let inputs = RawInputs {
            wall_area: Some(f64::NAN),
            ..reference_inputs()
        };
        let err = FeatureAdapter::build(&inputs).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "wall_area");
    }

    #[test]
    fn test_defaults_build() {
        let record = FeatureAdapter::build(&RawInputs::defaults()).unwrap();
        assert_eq!(record.relative_compactness, 0.8);
        assert_eq!(record.overall_height, 3.5);
        assert_eq!(record.orientation, 2);
        assert_eq!(record.glazing_area_distribution, 0);
    }

    #[test]
    fn test_record_round_trips_through_inputs() {
        let record = FeatureAdapter::build(&reference_inputs()).unwrap();
        let again = FeatureAdapter::build(&RawInputs::from(&record)).unwrap();
        assert_eq!(record, again);
    }

    #[test]
    fn test_deserialize_accepts_column_aliases() {
        let json = r#"{
            "Relative_Compactness": 0.8, "Surface_Area": 600, "Wall_Area": 300,
            "Roof_Area": 150, "Overall_Height": 7.0, "Orientation": 3,
            "Glazing_Area": 0.25, "Glazing_Area_Distribution": 2
        }"#;
        let inputs: RawInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs, reference_inputs());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let json = r#"{"relative_compactnes": 0.8}"#;
        assert!(serde_json::from_str::<RawInputs>(json).is_err());
    }

    #[test]
    fn test_deserialize_missing_fields_become_none() {
        let inputs: RawInputs = serde_json::from_str(r#"{"orientation": 4}"#).unwrap();
        assert_eq!(inputs.orientation, Some(4.0));
        assert!(inputs.surface_area.is_none());
        let err = FeatureAdapter::build(&inputs).unwrap_err();
        assert_eq!(err.violations.len(), 7);
    }
}
