//! Energy Load Predictor - HTTP API Server
//!
//! Serves the building-design form schema and runs one prediction per
//! submitted form.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   ENERGY LOAD PREDICTOR                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌────────────────┐   ┌───────────────────┐  │
//! │  │  API      │──►│ FeatureAdapter │──►│ InferenceEngine   │  │
//! │  │  (Axum)   │   │ (validation)   │   │ (ONNX Runtime)    │  │
//! │  └─────▲─────┘   └────────────────┘   └─────────┬─────────┘  │
//! │        └──────── Presentation ◄── interpret ◄───┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use energy_core::Predictor;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "energy_server=debug,energy_core=info,tower_http=debug".into());
    let (json_layer, plain_layer) = if config.is_production() {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .init();

    tracing::info!("{} v{} starting...", energy_core::constants::APP_NAME, energy_core::constants::APP_VERSION);
    tracing::info!("Model artifact: {}", config.model_path);

    // Load the model once; nothing is served without it
    let predictor = match Predictor::load(&config.engine()) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Cannot start: {}", e);
            return Err(e).context("model artifact could not be loaded, refusing to serve");
        }
    };
    tracing::info!(
        "Model ready ({} binding, layout {})",
        predictor.metadata().binding,
        predictor.metadata().layout_hash
    );

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);
    if !state.config.is_production() {
        cors = cors.allow_origin(Any);
    }

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/schema", get(handlers::schema::get))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
