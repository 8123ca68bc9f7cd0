//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use energy_core::{CoreError, FieldViolation, SCHEMA_HINT};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    ValidationError(String, Vec<FieldViolation>),
    MalformedBody(String),

    // Model errors
    SchemaMismatch(String),
    PredictionError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(..) | AppError::MalformedBody(_) => "validation_error",
            AppError::SchemaMismatch(_) => "schema_mismatch",
            AppError::PredictionError(_) => "prediction_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, error_message, details) = match self {
            AppError::ValidationError(msg, violations) => (
                StatusCode::BAD_REQUEST,
                msg,
                Some(json!(violations)),
            ),
            AppError::MalformedBody(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::SchemaMismatch(msg) => {
                tracing::warn!("Schema mismatch: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    msg,
                    Some(json!({ "hint": SCHEMA_HINT })),
                )
            }
            AppError::PredictionError(msg) => {
                tracing::error!("Prediction error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An error occurred during prediction. Details: {}", msg),
                    None,
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        let mut body = json!({
            "error": error_message,
            "kind": kind,
            "status": status.as_u16()
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(v) => AppError::ValidationError(message, v.violations),
            CoreError::SchemaMismatch { .. } => AppError::SchemaMismatch(message),
            CoreError::Prediction(_) => AppError::PredictionError(message),
            CoreError::Startup { .. } => AppError::InternalError(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("prediction task failed: {}", err))
    }
}
