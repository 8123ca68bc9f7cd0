//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The model was trained on a table whose columns carry exactly these names,
//! in exactly this order, with exactly these numeric kinds. Every tensor we
//! hand to the model is built from this table.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Change a column name or numeric kind → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE DESCRIPTORS
// ============================================================================

/// Numeric kind the model expects for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Float,
    Integer,
}

impl FeatureKind {
    fn tag(self) -> u8 {
        match self {
            FeatureKind::Float => b'f',
            FeatureKind::Integer => b'i',
        }
    }
}

/// Legal values for a feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureDomain {
    /// Inclusive continuous range
    Range { min: f64, max: f64 },
    /// Enumerated float choices
    Floats(&'static [f64]),
    /// Enumerated integer choices
    Integers(&'static [i64]),
}

impl FeatureDomain {
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match *self {
            FeatureDomain::Range { min, max } => (min..=max).contains(&value),
            FeatureDomain::Floats(options) => options.iter().any(|&o| o == value),
            FeatureDomain::Integers(options) => {
                value.fract() == 0.0 && options.iter().any(|&o| o as f64 == value)
            }
        }
    }

    /// Human-readable description used in validation messages
    pub fn describe(&self) -> String {
        match *self {
            FeatureDomain::Range { min, max } => format!("must be between {} and {}", min, max),
            FeatureDomain::Floats(options) => format!("must be one of {}", join(options)),
            FeatureDomain::Integers(options) => format!("must be one of {}", join(options)),
        }
    }
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Form control the feature is collected with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Slider,
    NumberInput,
    Select,
}

/// One column of the trained schema plus how the form collects it
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    /// Field name used by the API (snake_case)
    pub name: &'static str,
    /// Column name the model was trained with
    pub column: &'static str,
    pub label: &'static str,
    pub kind: FeatureKind,
    pub domain: FeatureDomain,
    pub control: Control,
    pub step: Option<f64>,
    pub default: f64,
    pub help: Option<&'static str>,
}

pub const OVERALL_HEIGHTS: &[f64] = &[3.5, 7.0];
pub const ORIENTATIONS: &[i64] = &[2, 3, 4, 5];
pub const GLAZING_DISTRIBUTIONS: &[i64] = &[0, 1, 2, 3, 4, 5];

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Features in exact order the model consumes them
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub static FEATURE_LAYOUT: [FeatureSpec; FEATURE_COUNT] = [
    // 0
    FeatureSpec {
        name: "relative_compactness",
        column: "Relative_Compactness",
        label: "Relative Compactness",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Range { min: 0.6, max: 1.0 },
        control: Control::Slider,
        step: Some(0.01),
        default: 0.8,
        help: None,
    },
    // 1
    FeatureSpec {
        name: "surface_area",
        column: "Surface_Area",
        label: "Surface Area (m²)",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Range { min: 500.0, max: 850.0 },
        control: Control::NumberInput,
        step: None,
        default: 600.0,
        help: None,
    },
    // 2
    FeatureSpec {
        name: "wall_area",
        column: "Wall_Area",
        label: "Wall Area (m²)",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Range { min: 200.0, max: 450.0 },
        control: Control::NumberInput,
        step: None,
        default: 300.0,
        help: None,
    },
    // 3
    FeatureSpec {
        name: "roof_area",
        column: "Roof_Area",
        label: "Roof Area (m²)",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Range { min: 100.0, max: 250.0 },
        control: Control::NumberInput,
        step: None,
        default: 150.0,
        help: None,
    },
    // 4
    FeatureSpec {
        name: "overall_height",
        column: "Overall_Height",
        label: "Overall Height (m)",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Floats(OVERALL_HEIGHTS),
        control: Control::Select,
        step: None,
        default: 3.5,
        help: None,
    },
    // 5
    FeatureSpec {
        name: "orientation",
        column: "Orientation",
        label: "Orientation",
        kind: FeatureKind::Integer,
        domain: FeatureDomain::Integers(ORIENTATIONS),
        control: Control::Select,
        step: None,
        default: 2.0,
        help: Some("Direction of the main facade."),
    },
    // 6
    FeatureSpec {
        name: "glazing_area",
        column: "Glazing_Area",
        label: "Glazing Area (Ratio)",
        kind: FeatureKind::Float,
        domain: FeatureDomain::Range { min: 0.0, max: 0.5 },
        control: Control::Slider,
        step: Some(0.01),
        default: 0.25,
        help: Some("Area of windows relative to floor area."),
    },
    // 7
    FeatureSpec {
        name: "glazing_area_distribution",
        column: "Glazing_Area_Distribution",
        label: "Glazing Area Distribution",
        kind: FeatureKind::Integer,
        domain: FeatureDomain::Integers(GLAZING_DISTRIBUTIONS),
        control: Control::Select,
        step: None,
        default: 0.0,
        help: Some("Distribution factor of the glazing area."),
    },
];

/// Total number of features
pub const FEATURE_COUNT: usize = 8;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Covers version, column names and numeric kinds, in order
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for spec in FEATURE_LAYOUT.iter() {
        hasher.update(spec.column.as_bytes());
        hasher.update(&[0]);
        hasher.update(&[spec.kind.tag()]);
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: String,
    pub feature_count: usize,
    pub columns: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: format!("{:08x}", layout_hash()),
            feature_count: FEATURE_COUNT,
            columns: FEATURE_LAYOUT.iter().map(|s| s.column.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by API field name or model column name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT
        .iter()
        .position(|s| s.name == name || s.column == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 8);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_column_order_matches_trained_schema() {
        let columns: Vec<&str> = FEATURE_LAYOUT.iter().map(|s| s.column).collect();
        assert_eq!(
            columns,
            vec![
                "Relative_Compactness",
                "Surface_Area",
                "Wall_Area",
                "Roof_Area",
                "Overall_Height",
                "Orientation",
                "Glazing_Area",
                "Glazing_Area_Distribution",
            ]
        );
    }

    #[test]
    fn test_integer_columns() {
        let integers: Vec<&str> = FEATURE_LAYOUT
            .iter()
            .filter(|s| s.kind == FeatureKind::Integer)
            .map(|s| s.name)
            .collect();
        assert_eq!(integers, vec!["orientation", "glazing_area_distribution"]);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_defaults_inside_domain() {
        for spec in FEATURE_LAYOUT.iter() {
            assert!(spec.domain.contains(spec.default), "default of {} out of domain", spec.name);
        }
    }

    #[test]
    fn test_domain_contains() {
        let range = FeatureDomain::Range { min: 0.0, max: 0.5 };
        assert!(range.contains(0.0));
        assert!(range.contains(0.5));
        assert!(!range.contains(0.51));
        assert!(!range.contains(f64::NAN));

        let heights = FeatureDomain::Floats(OVERALL_HEIGHTS);
        assert!(heights.contains(7.0));
        assert!(!heights.contains(5.0));

        let orientations = FeatureDomain::Integers(ORIENTATIONS);
        assert!(orientations.contains(3.0));
        assert!(!orientations.contains(3.5));
        assert!(!orientations.contains(1.0));
    }

    #[test]
    fn test_domain_describe() {
        assert_eq!(
            FeatureDomain::Integers(ORIENTATIONS).describe(),
            "must be one of 2, 3, 4, 5"
        );
        assert_eq!(
            FeatureDomain::Range { min: 0.6, max: 1.0 }.describe(),
            "must be between 0.6 and 1"
        );
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("relative_compactness"), Some(0));
        assert_eq!(feature_index("Orientation"), Some(5));
        assert_eq!(feature_index("glazing_area_distribution"), Some(7));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert_eq!(info.columns.len(), FEATURE_COUNT);
        assert_eq!(info.hash.len(), 8);
    }
}
