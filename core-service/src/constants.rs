//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change where the model artifact is looked up, only edit this file.

/// Default model artifact path (relative to the working directory)
///
/// The artifact is an ONNX export of the trained regressor.
pub const DEFAULT_MODEL_PATH: &str = "models/energy_efficiency.onnx";

/// Default ONNX Runtime intra-op thread count
///
/// One row per request, so a single thread is plenty.
pub const DEFAULT_INTRA_THREADS: usize = 1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Energy Load Predictor";

/// Unit shown next to every predicted load
pub const LOAD_UNIT: &str = "kW/h";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH")
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get ONNX intra-op thread count from environment or use default
pub fn get_intra_threads() -> usize {
    std::env::var("ONNX_INTRA_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_INTRA_THREADS)
}
