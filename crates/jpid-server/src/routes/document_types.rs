//! Supported document type listing

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct DocumentTypesResponse {
    supported_document_types: Vec<&'static str>,
    total_count: usize,
}

pub async fn list_document_types(State(state): State<AppState>) -> Json<DocumentTypesResponse> {
    let types: Vec<&'static str> = state
        .service()
        .factory()
        .list_supported_types()
        .iter()
        .map(|t| t.as_str())
        .collect();

    Json(DocumentTypesResponse {
        total_count: types.len(),
        supported_document_types: types,
    })
}
