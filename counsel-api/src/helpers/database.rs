use crate::config::ApiConfig;
use crate::storage::{DocumentStore, InMemoryDocumentStore, SqliteDocumentStore};
use anyhow::Context;
use std::sync::Arc;

/// Opens the document store once at startup. The handle is shared by every worker.
pub fn initialize_store(
    config: &ApiConfig,
    in_memory: bool,
) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let name = config.database.name.clone();

    if in_memory {
        tracing::warn!("Using in-memory document store; data is lost on shutdown");
        return Ok(Arc::new(InMemoryDocumentStore::new(name)));
    }

    let path = &config.database.path;
    let store = SqliteDocumentStore::open(path, name)
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    tracing::info!("Database initialized at {:?}", path);

    Ok(Arc::new(store))
}
