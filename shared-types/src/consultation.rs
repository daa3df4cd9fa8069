use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

pub const DEFAULT_STAGE: &str = "idea";

/// Upper bound on the length of a user message, counted in characters
pub const MAX_MESSAGE_CHARS: usize = 4000;

fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

/// Renders timestamps as RFC 3339 with exactly six fraction digits and a `Z` suffix.
pub fn format_micros(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn serialize_micros<S: Serializer>(
    ts: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_str(&format_micros(ts)),
        None => serializer.serialize_none(),
    }
}

/// Body of `POST /api/consultations`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateConsultationRequest {
    /// Company or idea name
    pub business_name: String,
    pub industry: String,
    /// One of idea, mvp, growth, scale. Stored as given.
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Primary goal for the session
    pub goal: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Consultation {
    pub id: String,
    pub business_name: String,
    pub industry: String,
    pub stage: String,
    pub goal: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, serialize_with = "serialize_micros")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, serialize_with = "serialize_micros")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/consultations/{id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SendMessageRequest {
    pub content: String,
}

impl SendMessageRequest {
    /// Checks the content length bounds, returning a human readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let chars = self.content.chars().count();
        if chars == 0 {
            return Err("Message content must not be empty".to_string());
        }
        if chars > MAX_MESSAGE_CHARS {
            return Err(format!(
                "Message content must be at most {} characters, got {}",
                MAX_MESSAGE_CHARS, chars
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub id: String,
    pub consultation_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, serialize_with = "serialize_micros")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, serialize_with = "serialize_micros")]
    pub updated_at: Option<DateTime<Utc>>,
}
