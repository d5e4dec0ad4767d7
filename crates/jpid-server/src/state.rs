//! Application state management

use std::sync::Arc;

use jpid_core::{JpidConfig, OcrBackend, ParseError, ParserFactory};

use crate::service::OcrService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: JpidConfig,
    service: OcrService,
}

impl AppState {
    /// Build the parser registry against `backend`.
    pub fn new(config: JpidConfig, backend: Arc<dyn OcrBackend>) -> Result<Self, ParseError> {
        let factory = Arc::new(ParserFactory::with_builtin(backend)?);
        let service = OcrService::new(factory, &config);
        Ok(Self::with_service(config, service))
    }

    /// Use a prepared service.
    pub fn with_service(config: JpidConfig, service: OcrService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, service }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &JpidConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &OcrService {
        &self.inner.service
    }
}
