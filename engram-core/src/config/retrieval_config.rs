use serde::{Deserialize, Serialize};

use super::defaults;

/// Hybrid retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Default number of results when the caller does not supply `k`.
    pub default_k: usize,
    /// Default character budget for result text.
    pub default_budget_chars: usize,
    /// Weight of the semantic signal when both signals are present.
    pub semantic_weight: f32,
    /// Weight of the lexical signal when both signals are present.
    pub lexical_weight: f32,
    /// Weight of the fused relevance signal in the final blend.
    pub fused_weight: f32,
    /// Weight of the decay score in the final blend.
    pub decay_weight: f32,
    /// Each sub-index is asked for `k * oversample_factor` candidates
    /// before fusion.
    pub oversample_factor: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: defaults::DEFAULT_RESULT_COUNT,
            default_budget_chars: defaults::DEFAULT_BUDGET_CHARS,
            semantic_weight: defaults::DEFAULT_SEMANTIC_WEIGHT,
            lexical_weight: defaults::DEFAULT_LEXICAL_WEIGHT,
            fused_weight: defaults::DEFAULT_FUSED_WEIGHT,
            decay_weight: defaults::DEFAULT_DECAY_WEIGHT,
            oversample_factor: defaults::DEFAULT_OVERSAMPLE_FACTOR,
        }
    }
}
