use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::helpers::serialization::decode_public;
use crate::storage::{Document, DocumentId, DocumentStore, Filter};
use serde::de::DeserializeOwned;
use std::sync::Arc;

// Liveness and diagnostics
pub mod system;

pub mod consultations;
pub mod messages;

pub const CONSULTATION_COLLECTION: &str = "consultation";
pub const MESSAGE_COLLECTION: &str = "message";

pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Malformed ids are reported as not found, same as unknown ones.
pub(crate) fn parse_consultation_id(raw: &str) -> AppResult<DocumentId> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Invalid consultation id".to_string()))
}

pub(crate) async fn find_consultation(
    store: &dyn DocumentStore,
    id: DocumentId,
) -> AppResult<Document> {
    store
        .find_one(CONSULTATION_COLLECTION, &Filter::by_id(id))
        .await?
        .ok_or_else(|| {
            tracing::warn!(consultation_id = %id, "Consultation not found");
            AppError::NotFound("Consultation not found".to_string())
        })
}

/// Re-reads a freshly inserted document so the response carries the stored stamps.
pub(crate) async fn find_inserted(
    store: &dyn DocumentStore,
    collection: &str,
    id: DocumentId,
) -> AppResult<Document> {
    store
        .find_one(collection, &Filter::by_id(id))
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Document {} missing from '{}' after insert",
                id, collection
            ))
        })
}

pub(crate) fn decode<T: DeserializeOwned>(doc: &Document) -> AppResult<T> {
    decode_public(doc)
        .map_err(|e| AppError::Internal(format!("Failed to decode stored document: {e}")))
}
