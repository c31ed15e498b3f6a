use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a chunk came from: the exact span of the source record it was
/// cut from. One row per chunk, written at ingestion, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub chunk_id: Uuid,
    pub source_id: Uuid,
    /// Byte offset of the span start in the source text.
    pub start_offset: u32,
    /// Byte offset one past the span end.
    pub end_offset: u32,
    /// How faithfully the span boundaries follow meaning, in [0, 1].
    /// Sentence-aligned chunks carry 1.0; hard character splits less.
    pub confidence: f32,
    /// When this row was written.
    pub tracked_at: DateTime<Utc>,
}
