use serde::{Deserialize, Serialize};

use super::defaults;

/// HNSW vector index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    /// Max connections per node on upper layers.
    pub m: usize,
    /// Max connections per node on layer 0. Edges beyond this are pruned
    /// by dropping the weakest link.
    pub m_max: usize,
    /// Build-time search breadth.
    pub ef_construction: usize,
    /// Query-time search breadth when the caller does not supply one.
    pub ef_search: usize,
    /// Embedding dimensionality. `None` fixes the dimension on first
    /// insert instead of at construction.
    pub dimension: Option<usize>,
    /// Vector snapshot file path. `None` disables snapshot persistence.
    pub snapshot_path: Option<String>,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            m: defaults::DEFAULT_HNSW_M,
            m_max: defaults::DEFAULT_HNSW_M_MAX,
            ef_construction: defaults::DEFAULT_EF_CONSTRUCTION,
            ef_search: defaults::DEFAULT_EF_SEARCH,
            dimension: None,
            snapshot_path: None,
        }
    }
}
