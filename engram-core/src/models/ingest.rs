use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{Payload, RecordKind};

/// An ingestion request: one record's worth of content plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    pub kind: RecordKind,
    pub payload: Payload,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl IngestRequest {
    /// Convenience constructor for the common text case.
    pub fn text(kind: RecordKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            payload: Payload::Text(text.into()),
            metadata: BTreeMap::new(),
        }
    }
}

/// What ingestion produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    pub source_id: Uuid,
    /// Chunk ids in source order. Empty for byte payloads and empty text.
    pub chunk_ids: Vec<Uuid>,
    /// How many chunks received a vector entry. Less than
    /// `chunk_ids.len()` when the embedding provider was unavailable.
    pub embedded_chunks: usize,
}
