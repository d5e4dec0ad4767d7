//! Request orchestration: validate, decode, parse under a deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jpid_core::models::config::JpidConfig;
use jpid_core::{decode_image_payload, InputError, ParseResult, ParserFactory};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};

/// Body of `POST /ocr`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrRequest {
    /// Base64 image, optionally with a data URL prefix.
    #[serde(default)]
    pub image: String,

    /// Document type identifier.
    #[serde(default)]
    pub document_type: String,
}

impl OcrRequest {
    /// Parse a raw JSON body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))
    }
}

/// Runs one extraction request end to end.
#[derive(Clone)]
pub struct OcrService {
    factory: Arc<ParserFactory>,
    max_image_bytes: usize,
    timeout: Duration,
}

impl OcrService {
    pub fn new(factory: Arc<ParserFactory>, config: &JpidConfig) -> Self {
        Self {
            factory,
            max_image_bytes: config.input.max_image_bytes,
            timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }

    /// Override the wall-clock budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn factory(&self) -> &ParserFactory {
        &self.factory
    }

    /// Validate the request, decode the image and run the parser.
    ///
    /// The parse runs on the blocking pool. If the deadline passes first
    /// the task is abandoned and a timeout is returned.
    pub async fn process(&self, request: OcrRequest) -> Result<ParseResult> {
        if request.image.trim().is_empty() {
            return Err(InputError::MissingImage.into());
        }
        let doc_id = request.document_type.trim();
        if doc_id.is_empty() {
            return Err(ApiError::MissingDocumentType);
        }

        let parser = self.factory.get_parser(doc_id)?;
        let document_type = parser.document_type();

        let image = decode_image_payload(&request.image, self.max_image_bytes)?;
        debug!("{}: decoded {} byte image", document_type, image.len());

        let start = Instant::now();
        let task = tokio::task::spawn_blocking(move || parser.parse(&image));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(data))) => {
                info!(
                    "{}: processed in {}ms",
                    document_type,
                    start.elapsed().as_millis()
                );
                Ok(ParseResult {
                    document_type,
                    data,
                })
            }
            Ok(Ok(Err(e))) => {
                warn!("{}: processing failed: {}", document_type, e);
                Err(e.into())
            }
            Ok(Err(join)) => Err(ApiError::Internal(format!("parser task failed: {}", join))),
            Err(_) => {
                warn!(
                    "{}: request timed out after {}s",
                    document_type,
                    self.timeout.as_secs()
                );
                Err(ApiError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
