//! Configuration module

use std::env;

use energy_core::constants;
use energy_core::EngineConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the ONNX model artifact
    pub model_path: String,

    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            model_path: constants::get_model_path(),

            intra_threads: constants::get_intra_threads(),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            model_path: self.model_path.clone(),
            intra_threads: self.intra_threads,
        }
    }
}
