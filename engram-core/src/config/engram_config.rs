use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

use super::chunker_config::ChunkerConfig;
use super::decay_config::DecayConfig;
use super::embedding_config::EmbeddingConfig;
use super::lexical_config::LexicalConfig;
use super::provenance_config::ProvenanceConfig;
use super::retrieval_config::RetrievalConfig;
use super::storage_config::StorageConfig;
use super::vector_config::VectorConfig;

/// Top-level engine configuration, one section per subsystem.
///
/// Every field has a default, so an empty TOML document is a valid
/// config. `validate` runs once at engine construction and fails fast;
/// nothing here is re-checked mid-query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub storage: StorageConfig,
    pub chunker: ChunkerConfig,
    pub lexical: LexicalConfig,
    pub vector: VectorConfig,
    pub embedding: EmbeddingConfig,
    pub decay: DecayConfig,
    pub provenance: ProvenanceConfig,
    pub retrieval: RetrievalConfig,
}

impl EngramConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngramConfig = toml::from_str(raw).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Check every cross-field invariant. Called by the engine before any
    /// subsystem is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.read_pool_size == 0 {
            return Err(ConfigError::invalid("storage.read_pool_size", "must be >= 1"));
        }

        if self.chunker.target_size == 0 {
            return Err(ConfigError::invalid("chunker.target_size", "must be >= 1"));
        }
        if self.chunker.overlap >= self.chunker.target_size {
            return Err(ConfigError::invalid(
                "chunker.overlap",
                format!(
                    "overlap ({}) must be < target_size ({})",
                    self.chunker.overlap, self.chunker.target_size
                ),
            ));
        }
        if self.chunker.max_sentence_factor < 1.0 {
            return Err(ConfigError::invalid(
                "chunker.max_sentence_factor",
                "must be >= 1.0",
            ));
        }

        if self.lexical.k1 <= 0.0 {
            return Err(ConfigError::invalid("lexical.k1", "must be > 0"));
        }
        if self.lexical.b <= 0.0 || self.lexical.b > 1.0 {
            return Err(ConfigError::invalid("lexical.b", "must be in (0, 1]"));
        }

        if self.vector.m < 2 {
            return Err(ConfigError::invalid("vector.m", "must be >= 2"));
        }
        if self.vector.m_max < self.vector.m {
            return Err(ConfigError::invalid(
                "vector.m_max",
                format!("must be >= m ({})", self.vector.m),
            ));
        }
        if self.vector.ef_construction == 0 {
            return Err(ConfigError::invalid("vector.ef_construction", "must be >= 1"));
        }
        if self.vector.ef_search == 0 {
            return Err(ConfigError::invalid("vector.ef_search", "must be >= 1"));
        }
        if self.vector.dimension == Some(0) {
            return Err(ConfigError::invalid("vector.dimension", "must be >= 1"));
        }

        if self.embedding.batch_size == 0 {
            return Err(ConfigError::invalid("embedding.batch_size", "must be >= 1"));
        }

        if self.decay.half_life_days <= 0.0 {
            return Err(ConfigError::invalid("decay.half_life_days", "must be > 0"));
        }
        if !(0.0..1.0).contains(&self.decay.threshold_score) {
            return Err(ConfigError::invalid(
                "decay.threshold_score",
                "must be in [0, 1)",
            ));
        }
        if self.decay.access_boost_base < 1.0 {
            return Err(ConfigError::invalid(
                "decay.access_boost_base",
                "must be >= 1.0",
            ));
        }
        if self.decay.access_boost_cap < 1.0 {
            return Err(ConfigError::invalid(
                "decay.access_boost_cap",
                "must be >= 1.0",
            ));
        }

        if self.provenance.cache_capacity == 0 {
            return Err(ConfigError::invalid(
                "provenance.cache_capacity",
                "must be >= 1",
            ));
        }

        for (field, value) in [
            ("retrieval.semantic_weight", self.retrieval.semantic_weight),
            ("retrieval.lexical_weight", self.retrieval.lexical_weight),
            ("retrieval.fused_weight", self.retrieval.fused_weight),
            ("retrieval.decay_weight", self.retrieval.decay_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(field, "must be in [0, 1]"));
            }
        }
        if self.retrieval.default_k == 0 {
            return Err(ConfigError::invalid("retrieval.default_k", "must be >= 1"));
        }
        if self.retrieval.oversample_factor == 0 {
            return Err(ConfigError::invalid(
                "retrieval.oversample_factor",
                "must be >= 1",
            ));
        }

        Ok(())
    }
}
