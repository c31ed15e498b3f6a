use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contiguous span of a source record's text, the unit of indexing and
/// retrieval.
///
/// `start_offset..end_offset` are byte offsets into the source text,
/// always on `char` boundaries. Spans for one source never overlap and
/// tile the source exactly, ordered by `chunk_index`. `text` may carry
/// leading overlap context repeated from the previous chunk; that context
/// is NOT reflected in the offsets, so provenance stays exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: Uuid,
    /// The record this chunk was cut from.
    pub source_id: Uuid,
    /// Chunk text, possibly with leading overlap context.
    pub text: String,
    pub start_offset: u32,
    pub end_offset: u32,
    /// Position within the source, starting at 0.
    pub chunk_index: u32,
    /// Set to the chunk's own id once a vector entry exists for it.
    pub embedding_ref: Option<Uuid>,
}

impl Chunk {
    /// Length in characters of the text retrieval would return.
    pub fn text_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// A chunk joined with the record context the ranking stages need.
/// Produced by the storage layer in one query per candidate batch.
#[derive(Debug, Clone)]
pub struct CandidateChunk {
    pub chunk: Chunk,
    /// `created_at` of the source record.
    pub created_at: DateTime<Utc>,
    /// How many times this chunk has been returned from a query.
    pub access_count: u64,
    /// Whether the source record is archived.
    pub archived: bool,
}
