//! Form schema models

use serde::Serialize;
use serde_json::{json, Value};

use energy_core::logic::features::{Control, FeatureDomain, FeatureKind, FeatureSpec, FEATURE_LAYOUT};
use energy_core::LayoutInfo;

/// One form control
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FeatureKind,
    pub control: Control,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    /// Integer columns report integer options and defaults
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

impl From<&FeatureSpec> for FormField {
    fn from(spec: &FeatureSpec) -> Self {
        let (min, max, options) = match spec.domain {
            FeatureDomain::Range { min, max } => (Some(min), Some(max), Vec::new()),
            FeatureDomain::Floats(values) => (None, None, values.iter().map(|v| json!(v)).collect()),
            FeatureDomain::Integers(values) => (None, None, values.iter().map(|v| json!(v)).collect()),
        };
        let default = match spec.kind {
            FeatureKind::Float => json!(spec.default),
            FeatureKind::Integer => json!(spec.default as i64),
        };
        Self {
            name: spec.name,
            column: spec.column,
            label: spec.label,
            kind: spec.kind,
            control: spec.control,
            min,
            max,
            step: spec.step,
            options,
            default,
            help: spec.help,
        }
    }
}

/// Schema response
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub title: &'static str,
    pub layout: LayoutInfo,
    pub fields: Vec<FormField>,
}

impl SchemaResponse {
    pub fn current() -> Self {
        Self {
            title: "Energy Efficiency Prediction",
            layout: LayoutInfo::current(),
            fields: FEATURE_LAYOUT.iter().map(FormField::from).collect(),
        }
    }
}
