//! Form schema handler

use axum::Json;

use crate::models::SchemaResponse;

/// Describe the eight form controls and the layout they feed
pub async fn get() -> Json<SchemaResponse> {
    Json(SchemaResponse::current())
}
