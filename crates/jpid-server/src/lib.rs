//! HTTP boundary for Japanese identity document extraction.
//!
//! `POST /ocr` decodes the image, resolves the parser for the requested
//! document type and runs it under a wall-clock budget.

pub mod error;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use service::{OcrRequest, OcrService};
pub use state::AppState;

/// JSON framing allowance on top of the base64-encoded image.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let body_limit = config.input.max_image_bytes.div_ceil(3) * 4 + BODY_OVERHEAD;

    let mut router = Router::new()
        .route(
            "/ocr",
            post(routes::ocr::process_document).fallback(routes::method_not_allowed),
        )
        .route(
            "/health",
            get(routes::health::health_check).fallback(routes::method_not_allowed),
        )
        .route(
            "/document-types",
            get(routes::document_types::list_document_types).fallback(routes::method_not_allowed),
        )
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    if config.server.allow_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router.with_state(state)
}
