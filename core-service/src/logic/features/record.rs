//! Feature Record - the single typed row submitted to the model
//!
//! Built by [`FeatureAdapter`](super::adapter::FeatureAdapter) from validated input,
//! so a record in hand is always complete and inside its domain. Fields are
//! crate-private; outside this crate a record can only be read.

use serde::Serialize;

use super::layout::{FeatureKind, FEATURE_COUNT, FEATURE_LAYOUT};

/// A value pinned to the numeric kind of its column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Float(f64),
    Integer(i64),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Float(_) => FeatureKind::Float,
            FeatureValue::Integer(_) => FeatureKind::Integer,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Float(v) => v,
            FeatureValue::Integer(v) => v as f64,
        }
    }
}

/// Building-design parameters for one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub(crate) relative_compactness: f64,
    pub(crate) surface_area: f64,
    pub(crate) wall_area: f64,
    pub(crate) roof_area: f64,
    pub(crate) overall_height: f64,
    pub(crate) orientation: i64,
    pub(crate) glazing_area: f64,
    pub(crate) glazing_area_distribution: i64,
}

impl FeatureRecord {
    pub fn relative_compactness(&self) -> f64 {
        self.relative_compactness
    }

    pub fn surface_area(&self) -> f64 {
        self.surface_area
    }

    pub fn wall_area(&self) -> f64 {
        self.wall_area
    }

    pub fn roof_area(&self) -> f64 {
        self.roof_area
    }

    pub fn overall_height(&self) -> f64 {
        self.overall_height
    }

    pub fn orientation(&self) -> i64 {
        self.orientation
    }

    pub fn glazing_area(&self) -> f64 {
        self.glazing_area
    }

    pub fn glazing_area_distribution(&self) -> i64 {
        self.glazing_area_distribution
    }

    /// Values in FEATURE_LAYOUT order
    pub fn values(&self) -> [FeatureValue; FEATURE_COUNT] {
        [
            FeatureValue::Float(self.relative_compactness),
            FeatureValue::Float(self.surface_area),
            FeatureValue::Float(self.wall_area),
            FeatureValue::Float(self.roof_area),
            FeatureValue::Float(self.overall_height),
            FeatureValue::Integer(self.orientation),
            FeatureValue::Float(self.glazing_area),
            FeatureValue::Integer(self.glazing_area_distribution),
        ]
    }

    /// (column name, value) pairs in FEATURE_LAYOUT order
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> {
        FEATURE_LAYOUT
            .iter()
            .map(|spec| spec.column)
            .zip(self.values())
    }

    /// Positional row for models that take one packed tensor
    pub fn to_f32_row(&self) -> [f32; FEATURE_COUNT] {
        self.values().map(|v| v.as_f64() as f32)
    }

    pub fn to_f64_row(&self) -> [f64; FEATURE_COUNT] {
        self.values().map(|v| v.as_f64())
    }
}
