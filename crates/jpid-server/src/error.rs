//! Error types for the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jpid_core::{InputError, ParseError};
use serde::Serialize;
use thiserror::Error;

/// Handler result type.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced to API clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("documentType field is required")]
    MissingDocumentType,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Request timeout: processing exceeded {0} seconds")]
    Timeout(u64),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::MissingDocumentType => StatusCode::BAD_REQUEST,
            ApiError::Input(e) => match e {
                InputError::MissingImage | InputError::InvalidBase64 | InputError::EmptyImage => {
                    StatusCode::BAD_REQUEST
                }
                InputError::TooLarge { .. } | InputError::UnsupportedFormat => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            ApiError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        tracing::debug!("Sending error response: {} - {}", status.as_u16(), message);

        let body = Json(ErrorResponse {
            error: ErrorBody {
                code: status.as_u16(),
                message,
            },
        });

        (status, body).into_response()
    }
}
