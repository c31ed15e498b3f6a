use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provenance::ProvenanceRecord;

/// A retrieval request against the hybrid index.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Raw keyword text for the lexical side. May be empty when an
    /// embedding carries the query alone.
    pub text: String,
    /// Query embedding for the semantic side, when the caller has one.
    pub embedding: Option<Vec<f32>>,
    /// Maximum number of results.
    pub k: usize,
    /// Character budget across all result texts.
    pub budget_chars: usize,
    /// Vector search breadth override. `None` uses the configured
    /// `ef_search`.
    pub ef: Option<usize>,
}

/// Per-signal score breakdown for one result.
///
/// `lexical`/`semantic` are min-max normalized within the candidate
/// list; `None` means the chunk did not appear in that sub-search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalScores {
    pub lexical: Option<f32>,
    pub semantic: Option<f32>,
    /// Weighted combination of the present signals.
    pub fused: f32,
    /// Decay score at query time.
    pub decay: f32,
    /// The ranking key: blend of `fused` and `decay`.
    pub final_score: f32,
}

/// One ranked retrieval result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub chunk_id: Uuid,
    pub source_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub scores: SignalScores,
    /// Span-of-origin for this chunk, when tracked.
    pub provenance: Option<ProvenanceRecord>,
}

/// The full response envelope for a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    /// True when the query wanted a semantic signal but none was
    /// available: no embedding, provider down, or empty vector index.
    /// Distinguishes "no semantic signal" from "no results".
    pub semantic_degraded: bool,
}

impl SearchOutcome {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            semantic_degraded: false,
        }
    }
}
