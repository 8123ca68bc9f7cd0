//! Logic Module - Prediction Core
//!
//! - `features/` - feature layout, typed record, form → record adapter
//! - `model/` - inference engine contract and ONNX Runtime engine
//! - `prediction/` - output interpretation and display rendering
//! - `pipeline` - the single request path tying them together

pub mod features;
pub mod model;
pub mod prediction;
pub mod pipeline;
