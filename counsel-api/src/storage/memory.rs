use super::{stamp_new_document, Document, DocumentId, DocumentStore, Filter, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Collections = BTreeMap<String, Vec<Document>>;

/// Process-local store, used when no database file is wanted.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    name: String,
    collections: Arc<Mutex<Collections>>,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.collections
            .lock()
            .map_err(|e| StoreError::OperationFailed(format!("Lock error: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError> {
        let (id, document) = stamp_new_document(document);
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.find_many(collection, filter, 1).await?.into_iter().next())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        filter.validate()?;
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreValue;

    fn doc(role: &str) -> Document {
        let mut doc = Document::new();
        doc.insert("role".to_string(), StoreValue::from(role));
        doc
    }

    #[actix_rt::test]
    async fn test_insert_then_find_by_id() {
        let store = InMemoryDocumentStore::new("test");
        let id = store.insert_one("message", doc("user")).await.unwrap();

        let found = store
            .find_one("message", &Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("role"), Some(&StoreValue::from("user")));
    }

    #[actix_rt::test]
    async fn test_find_many_filters_and_limits_in_order() {
        let store = InMemoryDocumentStore::new("test");
        for role in ["user", "assistant", "user", "user"] {
            store.insert_one("message", doc(role)).await.unwrap();
        }

        let users = store
            .find_many("message", &Filter::all().eq("role", "user"), 2)
            .await
            .unwrap();
        assert_eq!(users.len(), 2);

        let all = store.find_many("message", &Filter::all(), 10).await.unwrap();
        let roles: Vec<_> = all
            .iter()
            .map(|d| d.get("role").and_then(StoreValue::as_str).unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "assistant", "user", "user"]);
    }

    #[actix_rt::test]
    async fn test_collection_names_are_sorted() {
        let store = InMemoryDocumentStore::new("test");
        store.insert_one("message", doc("user")).await.unwrap();
        store.insert_one("consultation", Document::new()).await.unwrap();

        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["consultation".to_string(), "message".to_string()]
        );
    }
}
