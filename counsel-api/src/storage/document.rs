//! Store-native document values.
//!
//! Documents are field maps whose values keep identifiers and timestamps as
//! typed variants. On disk they are encoded as extended JSON, where an id is
//! `{"$oid": "<uuid>"}` and a timestamp is `{"$date": "<rfc3339>"}`, so the
//! types survive a round trip through the store.

use super::StoreError;
use chrono::{DateTime, SubsecRound, Utc};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const OID_KEY: &str = "$oid";
pub const DATE_KEY: &str = "$date";

pub type Document = BTreeMap<String, StoreValue>;

/// Opaque identifier generated by the store for every inserted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Id(DocumentId),
    Timestamp(DateTime<Utc>),
    Array(Vec<StoreValue>),
    Document(Document),
}

impl StoreValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<DocumentId> {
        match self {
            StoreValue::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Encodes the value for persistence, keeping ids and timestamps tagged.
    pub fn to_extended_json(&self) -> Value {
        match self {
            StoreValue::Null => Value::Null,
            StoreValue::Bool(b) => Value::Bool(*b),
            StoreValue::Int(i) => Value::from(*i),
            StoreValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            StoreValue::String(s) => Value::String(s.clone()),
            StoreValue::Id(id) => json!({ OID_KEY: id.to_string() }),
            StoreValue::Timestamp(ts) => json!({ DATE_KEY: format_timestamp(ts) }),
            StoreValue::Array(items) => {
                Value::Array(items.iter().map(StoreValue::to_extended_json).collect())
            }
            StoreValue::Document(doc) => Value::Object(document_to_extended_json(doc)),
        }
    }

    pub fn from_extended_json(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(oid)) = map.get(OID_KEY) {
                        return Ok(StoreValue::Id(oid.parse()?));
                    }
                    if let Some(Value::String(date)) = map.get(DATE_KEY) {
                        return Ok(StoreValue::Timestamp(parse_timestamp(date)?));
                    }
                }
                let doc = map
                    .into_iter()
                    .map(|(k, v)| Ok((k, StoreValue::from_extended_json(v)?)))
                    .collect::<Result<Document, StoreError>>()?;
                Ok(StoreValue::Document(doc))
            }
            Value::Array(items) => items
                .into_iter()
                .map(StoreValue::from_extended_json)
                .collect::<Result<Vec<_>, _>>()
                .map(StoreValue::Array),
            other => Ok(StoreValue::from_plain_json(other)),
        }
    }

    /// Converts plain JSON without interpreting `$oid`/`$date` wrappers.
    pub fn from_plain_json(value: Value) -> Self {
        match value {
            Value::Null => StoreValue::Null,
            Value::Bool(b) => StoreValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => StoreValue::Int(i),
                None => StoreValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => StoreValue::String(s),
            Value::Array(items) => {
                StoreValue::Array(items.into_iter().map(StoreValue::from_plain_json).collect())
            }
            Value::Object(map) => StoreValue::Document(
                map.into_iter()
                    .map(|(k, v)| (k, StoreValue::from_plain_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::String(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::String(value)
    }
}

impl From<Option<String>> for StoreValue {
    fn from(value: Option<String>) -> Self {
        value.map(StoreValue::String).unwrap_or(StoreValue::Null)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<bool> for StoreValue {
    fn from(value: bool) -> Self {
        StoreValue::Bool(value)
    }
}

impl From<DocumentId> for StoreValue {
    fn from(value: DocumentId) -> Self {
        StoreValue::Id(value)
    }
}

impl From<DateTime<Utc>> for StoreValue {
    fn from(value: DateTime<Utc>) -> Self {
        StoreValue::Timestamp(value)
    }
}

pub fn document_to_extended_json(doc: &Document) -> Map<String, Value> {
    doc.iter()
        .map(|(k, v)| (k.clone(), v.to_extended_json()))
        .collect()
}

pub fn document_from_extended_json(value: Value) -> Result<Document, StoreError> {
    match StoreValue::from_extended_json(value)? {
        StoreValue::Document(doc) => Ok(doc),
        other => Err(StoreError::Corrupt(format!(
            "expected a document, found {:?}",
            other
        ))),
    }
}

/// Current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    shared_types::format_micros(ts)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid timestamp '{}': {}", raw, e)))
}
