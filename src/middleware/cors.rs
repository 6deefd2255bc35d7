use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;

/// CORS layer for the configured frontend origin and any additional origins.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .into_iter()
        // A literal "*" is not a valid list entry; the wildcard middleware covers it.
        .filter(|origin| origin != "*")
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, "Ignoring unusable CORS origin: {}", e);
                None
            }
        })
        .collect();

    info!("CORS configured with allowed origins: {:?}", origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Opens every response to all origins, on top of the allow-list layer.
pub async fn wildcard_cors_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let wildcard = HeaderValue::from_static("*");
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, wildcard.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, wildcard.clone());
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, wildcard);
    response
}
