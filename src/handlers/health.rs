use axum::response::Json;
use tracing::info;

use crate::models::{HealthResponse, MessageResponse};

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    info!("Health check endpoint called");
    Json(HealthResponse::healthy())
}

/// `OPTIONS /api/anonymize` acknowledgement. The route sits outside the
/// allow-list CORS layer, so preflights to it are answered here too.
pub async fn options_anonymize_handler() -> Json<MessageResponse> {
    Json(MessageResponse::ok())
}
