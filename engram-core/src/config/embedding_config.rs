use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding endpoint. `None` runs the engine
    /// lexical-only.
    pub base_url: Option<String>,
    /// Hard per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first attempt, for transport errors and 5xx.
    pub max_retries: u32,
    /// Texts per batch request.
    pub batch_size: usize,
    /// L1 cache capacity (entries).
    pub cache_size: u64,
    /// L1 cache time-to-live in seconds.
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: defaults::DEFAULT_EMBED_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_EMBED_MAX_RETRIES,
            batch_size: defaults::DEFAULT_EMBED_BATCH_SIZE,
            cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            cache_ttl_secs: defaults::DEFAULT_L1_CACHE_TTL_SECS,
        }
    }
}
