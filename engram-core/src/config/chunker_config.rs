use serde::{Deserialize, Serialize};

use super::defaults;

/// Chunker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Target chunk size in characters.
    pub target_size: usize,
    /// Characters of leading context repeated from the previous chunk.
    /// Must be strictly less than `target_size`.
    pub overlap: usize,
    /// A single sentence longer than `target_size * max_sentence_factor`
    /// is hard-split at character boundaries.
    pub max_sentence_factor: f32,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_size: defaults::DEFAULT_CHUNK_TARGET_CHARS,
            overlap: defaults::DEFAULT_CHUNK_OVERLAP_CHARS,
            max_sentence_factor: defaults::DEFAULT_MAX_SENTENCE_FACTOR,
        }
    }
}
