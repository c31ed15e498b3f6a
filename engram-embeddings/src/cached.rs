//! L1 cache wrapper for any embedding provider.
//!
//! Keys are blake3 content hashes, so identical texts hit regardless of
//! where they appear. TinyLFU admission with per-entry TTL via moka.

use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use engram_core::config::EmbeddingConfig;
use engram_core::errors::EmbeddingError;
use engram_core::traits::IEmbeddingProvider;
use engram_core::EngramResult;

/// Wraps a provider with an in-memory embedding cache.
pub struct CachedProvider<P> {
    inner: P,
    cache: Cache<String, Vec<f32>>,
}

impl<P: IEmbeddingProvider> CachedProvider<P> {
    pub fn new(inner: P, config: &EmbeddingConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_size)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Self { inner, cache }
    }

    fn cache_key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Number of cached embeddings.
    pub fn cached_len(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<P: IEmbeddingProvider> IEmbeddingProvider for CachedProvider<P> {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        let key = Self::cache_key(text);
        if let Some(hit) = self.cache.get(&key) {
            debug!("embedding cache hit");
            return Ok(hit);
        }
        let vector = self.inner.embed(text)?;
        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    /// Serves hits from the cache and embeds only the misses, in one
    /// batch, preserving input order in the output.
    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| Self::cache_key(t)).collect();
        let mut results: Vec<Option<Vec<f32>>> = keys.iter().map(|k| self.cache.get(k)).collect();

        let missing: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(i, _)| i)
            .collect();

        if !missing.is_empty() {
            let miss_texts: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let embedded = self.inner.embed_batch(&miss_texts)?;
            if embedded.len() != miss_texts.len() {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!(
                        "batch of {} misses produced {} embeddings",
                        miss_texts.len(),
                        embedded.len()
                    ),
                }
                .into());
            }
            debug!(hits = texts.len() - missing.len(), misses = missing.len(), "embedding batch");
            for (&i, vector) in missing.iter().zip(embedded) {
                self.cache.insert(keys[i].clone(), vector.clone());
                results[i] = Some(vector);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
