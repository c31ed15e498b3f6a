use serde::{Deserialize, Serialize};

use super::defaults;

/// Provenance tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Capacity of the in-memory LRU lookup cache. Rows beyond this are
    /// evicted from the cache but remain durable in storage.
    pub cache_capacity: usize,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            cache_capacity: defaults::DEFAULT_PROVENANCE_CACHE_CAPACITY,
        }
    }
}
