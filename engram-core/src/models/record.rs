use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of content a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A short, timestamped occurrence.
    Event,
    /// A longer body of text worth chunking.
    Document,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Event => "event",
            RecordKind::Document => "document",
        }
    }
}

/// Record payload. Text is chunked and indexed; bytes are stored opaque
/// and never enter the indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

/// The unit of ingestion. Append-only: a record is never mutated after
/// creation except for the soft `archived` flag. Ids are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// UUID v4 identifier.
    pub id: Uuid,
    /// What kind of content this is.
    pub kind: RecordKind,
    /// The content itself.
    pub payload: Payload,
    /// Free-form caller metadata.
    pub metadata: BTreeMap<String, String>,
    /// When this record was ingested.
    pub created_at: DateTime<Utc>,
    /// Soft archival: excluded from new queries, never physically deleted.
    pub archived: bool,
}

impl Record {
    pub fn new(kind: RecordKind, payload: Payload, metadata: BTreeMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            payload,
            metadata,
            created_at: Utc::now(),
            archived: false,
        }
    }

    /// The text body, when this record has one.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Bytes(_) => None,
        }
    }

    /// blake3 hash of the payload, used as the embedding-cache key.
    pub fn content_hash(&self) -> String {
        let bytes = match &self.payload {
            Payload::Text(text) => text.as_bytes(),
            Payload::Bytes(bytes) => bytes.as_slice(),
        };
        blake3::hash(bytes).to_hex().to_string()
    }
}

/// Identity equality: two records are equal if they have the same id.
/// For payload comparison, compare `payload` fields directly.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Filter for [`Record`] queries. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub kind: Option<RecordKind>,
    /// Half-open range: `created_at` in `[from, to)`.
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// `Some(false)` is the common case: live records only.
    pub archived: Option<bool>,
}
