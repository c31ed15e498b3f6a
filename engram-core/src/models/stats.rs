use serde::{Deserialize, Serialize};

/// Point-in-time size counters across the engine's structures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub records: usize,
    pub chunks: usize,
    /// Chunks currently indexed lexically.
    pub lexical_docs: usize,
    /// Distinct terms in the lexical index.
    pub lexical_terms: usize,
    /// Nodes in the vector index, tombstones excluded.
    pub vector_nodes: usize,
    /// Fixed embedding width, once known.
    pub vector_dimension: Option<usize>,
    /// Provenance rows currently held in the LRU cache.
    pub provenance_cached: usize,
}
