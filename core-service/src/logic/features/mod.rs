//! Features Module - Form Inputs → Model Schema
//!
//! Centralized feature layout plus the adapter that turns raw form values
//! into the exact typed row the model was trained on.

pub mod layout;
pub mod record;
pub mod adapter;

// Re-export common types
pub use layout::{
    FeatureDomain, FeatureKind, FeatureSpec, LayoutInfo, Control,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, layout_hash,
};
pub use record::{FeatureRecord, FeatureValue};
pub use adapter::{FeatureAdapter, RawInputs};
