use serde::{Deserialize, Serialize};

use super::defaults;

/// BM25 lexical index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Document-length normalization strength, in (0, 1].
    pub b: f32,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            k1: defaults::DEFAULT_BM25_K1,
            b: defaults::DEFAULT_BM25_B,
        }
    }
}
