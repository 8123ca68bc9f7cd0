//! Prediction Module - model output → stable result → display

pub mod result;
pub mod display;

pub use result::{interpret, PredictionResult};
pub use display::{render, Metric, Presentation, Tone};
