pub mod analyze;
pub mod create_pdf;
pub mod health;

pub use analyze::*;
pub use create_pdf::*;
pub use health::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, options, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, logging_middleware, wildcard_cors_middleware};
use crate::state::AppState;

/// Builds the full application router with its middleware stack.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();
    let cors = cors_layer(&state.config);

    // `/api/anonymize` is mounted after the allow-list layer so its OPTIONS
    // requests reach the handler instead of being answered as preflights.
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/analyze-cv", post(analyze_cv_handler))
        .route("/api/create-pdf", post(create_pdf_handler))
        .layer(cors)
        .route("/api/anonymize", options(options_anonymize_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(wildcard_cors_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
