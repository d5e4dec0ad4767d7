//! Document extraction endpoint

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jpid_core::{InputError, ParseResult};
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::service::OcrRequest;
use crate::state::AppState;

/// `POST /ocr`
pub async fn process_document(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ParseResult>> {
    let start = Instant::now();
    let body = body.map_err(|rejection| body_error(&state, rejection))?;
    info!("OCR request received ({} bytes)", body.len());

    let request = OcrRequest::from_json(&body)?;
    debug!(
        "Request parsed: documentType={}, imageSize={} bytes",
        request.document_type,
        request.image.len()
    );

    let result = state.service().process(request).await;
    info!(
        "OCR request completed in {}ms ({})",
        start.elapsed().as_millis(),
        if result.is_ok() { "ok" } else { "error" }
    );

    result.map(Json)
}

/// Map a body read failure into the JSON error envelope.
///
/// A body over the router limit can only hold an oversized image.
fn body_error(state: &AppState, rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let limit = state.config().input.max_image_bytes;
        warn!("Request body exceeds limit for {} byte images", limit);
        ApiError::Input(InputError::TooLarge { limit })
    } else {
        ApiError::InvalidJson(rejection.body_text())
    }
}
