use super::document::{
    document_from_extended_json, document_to_extended_json, format_timestamp,
};
use super::migrations::run_migrations;
use super::{
    stamp_new_document, Document, DocumentId, DocumentStore, Filter, StoreError, StoreValue,
    CREATED_AT_FIELD, ID_FIELD,
};
use crate::DbConnection;
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Document store kept in a single SQLite table, one JSON body per row.
pub struct SqliteDocumentStore {
    name: String,
    connection: DbConnection,
}

impl SqliteDocumentStore {
    pub fn open(path: &Path, name: impl Into<String>) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::OperationFailed(format!(
                        "Failed to create database directory: {e}"
                    ))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn, name)
    }

    pub fn open_in_memory(name: impl Into<String>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, name)
    }

    fn from_connection(mut conn: Connection, name: impl Into<String>) -> Result<Self, StoreError> {
        run_migrations(&mut conn)?;
        Ok(Self {
            name: name.into(),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|e| StoreError::OperationFailed(format!("Lock error: {}", e)))
    }
}

/// Compiles a filter into `AND`-joined predicates plus their bound values.
fn compile_filter(filter: &Filter) -> Result<(String, Vec<SqlValue>), StoreError> {
    filter.validate()?;

    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for (field, value) in filter.conditions() {
        let path = format!("'$.\"{}\"'", field);
        match value {
            StoreValue::Id(id) if field == ID_FIELD => {
                clauses.push("id = ?".to_string());
                values.push(SqlValue::Text(id.to_string()));
            }
            StoreValue::Id(id) => {
                clauses.push(format!("json_extract(body, '$.\"{}\".\"$oid\"') = ?", field));
                values.push(SqlValue::Text(id.to_string()));
            }
            StoreValue::Timestamp(ts) => {
                clauses.push(format!(
                    "json_extract(body, '$.\"{}\".\"$date\"') = ?",
                    field
                ));
                values.push(SqlValue::Text(format_timestamp(ts)));
            }
            StoreValue::String(s) => {
                clauses.push(format!(
                    "json_type(body, {path}) = 'text' AND json_extract(body, {path}) = ?"
                ));
                values.push(SqlValue::Text(s.clone()));
            }
            StoreValue::Int(i) => {
                clauses.push(format!(
                    "json_type(body, {path}) = 'integer' AND json_extract(body, {path}) = ?"
                ));
                values.push(SqlValue::Integer(*i));
            }
            StoreValue::Float(f) => {
                clauses.push(format!(
                    "json_type(body, {path}) IN ('integer', 'real') AND json_extract(body, {path}) = ?"
                ));
                values.push(SqlValue::Real(*f));
            }
            StoreValue::Bool(b) => {
                clauses.push(format!("json_type(body, {path}) = ?"));
                values.push(SqlValue::Text(if *b { "true" } else { "false" }.to_string()));
            }
            StoreValue::Null | StoreValue::Array(_) | StoreValue::Document(_) => {
                return Err(StoreError::InvalidFilter(format!(
                    "field '{}' can only be matched against a scalar value",
                    field
                )));
            }
        }
    }

    Ok((clauses.join(" AND "), values))
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError> {
        let (id, document) = stamp_new_document(document);
        let created_at = match document.get(CREATED_AT_FIELD) {
            Some(StoreValue::Timestamp(ts)) => format_timestamp(ts),
            _ => {
                return Err(StoreError::OperationFailed(
                    "Document was not stamped with created_at".to_string(),
                ))
            }
        };
        let body = serde_json::to_string(&document_to_extended_json(&document))?;

        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO documents (id, collection, body, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![id.to_string(), collection, body, created_at],
        )?;

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
        let (predicates, filter_values) = compile_filter(filter)?;

        let mut sql = String::from("SELECT body FROM documents WHERE collection = ?");
        if !predicates.is_empty() {
            sql.push_str(" AND ");
            sql.push_str(&predicates);
        }
        sql.push_str(" ORDER BY seq ASC LIMIT ?");

        let mut values = Vec::with_capacity(filter_values.len() + 2);
        values.push(SqlValue::Text(collection.to_string()));
        values.extend(filter_values);
        values.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let bodies = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| document_from_extended_json(serde_json::from_str(body)?))
            .collect()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT collection FROM documents ORDER BY collection ASC")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}
