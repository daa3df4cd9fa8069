//! Conversion of store documents into transport JSON.
//!
//! Ids become their string form and timestamps become RFC 3339 text. Everything
//! else keeps its shape, so applying the conversion to text-only input is a no-op.

use crate::storage::document::format_timestamp;
use crate::storage::{Document, StoreValue, ID_FIELD};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub const PUBLIC_ID_FIELD: &str = "id";

pub fn serialize_value(value: &StoreValue) -> Value {
    match value {
        StoreValue::Id(id) => Value::String(id.to_string()),
        StoreValue::Timestamp(ts) => Value::String(format_timestamp(ts)),
        StoreValue::Array(items) => Value::Array(items.iter().map(serialize_value).collect()),
        StoreValue::Document(doc) => Value::Object(serialize_document(doc)),
        StoreValue::Null => Value::Null,
        StoreValue::Bool(b) => Value::Bool(*b),
        StoreValue::Int(i) => Value::from(*i),
        StoreValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        StoreValue::String(s) => Value::String(s.clone()),
    }
}

pub fn serialize_document(doc: &Document) -> Map<String, Value> {
    doc.iter()
        .map(|(key, value)| (key.clone(), serialize_value(value)))
        .collect()
}

/// Serializes a document and exposes its `_id` under the public `id` key.
pub fn to_public_json(doc: &Document) -> Map<String, Value> {
    let mut map = serialize_document(doc);
    if let Some(id) = map.remove(ID_FIELD) {
        map.insert(PUBLIC_ID_FIELD.to_string(), id);
    }
    map
}

/// Decodes a stored document into one of the public API models.
pub fn decode_public<T: DeserializeOwned>(doc: &Document) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(to_public_json(doc)))
}
