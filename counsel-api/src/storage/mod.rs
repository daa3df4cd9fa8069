use async_trait::async_trait;

pub mod document;
mod memory;
pub mod migrations;
pub mod sqlite;

pub use document::{Document, DocumentId, StoreValue};
pub use memory::InMemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

pub const ID_FIELD: &str = "_id";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Insert-and-query access to named document collections.
///
/// Every inserted document is stamped with `_id`, `created_at` and
/// `updated_at`. Queries return documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Logical database name, reported by diagnostics.
    fn name(&self) -> &str;

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt document: {0}")]
    Corrupt(String),

    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

/// Conjunction of top-level field equality conditions.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, StoreValue)>,
}

impl Filter {
    /// Matches every document in a collection
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: DocumentId) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<StoreValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, StoreValue)] {
        &self.conditions
    }

    /// A `Float` condition also matches stored integers of the same value.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| match (document.get(field), expected) {
                (Some(StoreValue::Int(stored)), StoreValue::Float(f)) => *stored as f64 == *f,
                (stored, expected) => stored == Some(expected),
            })
    }

    /// Rejects field names that cannot be addressed as a top-level key.
    pub fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in &self.conditions {
            let valid_name = !field.is_empty()
                && field
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid_name {
                return Err(StoreError::InvalidFilter(format!(
                    "unsupported field name '{}'",
                    field
                )));
            }
            if matches!(
                value,
                StoreValue::Null | StoreValue::Array(_) | StoreValue::Document(_)
            ) {
                return Err(StoreError::InvalidFilter(format!(
                    "field '{}' can only be matched against a scalar value",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// Applies the insert-time stamps shared by every backend.
pub(crate) fn stamp_new_document(mut document: Document) -> (DocumentId, Document) {
    let id = document
        .get(ID_FIELD)
        .and_then(StoreValue::as_id)
        .unwrap_or_default();
    let now = document::now();

    document.insert(ID_FIELD.to_string(), StoreValue::Id(id));
    document.insert(CREATED_AT_FIELD.to_string(), StoreValue::Timestamp(now));
    document.insert(UPDATED_AT_FIELD.to_string(), StoreValue::Timestamp(now));
    (id, document)
}
