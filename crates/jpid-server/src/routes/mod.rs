//! Route handlers

pub mod document_types;
pub mod health;
pub mod ocr;

use crate::error::ApiError;

/// Fallback for a known path with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
