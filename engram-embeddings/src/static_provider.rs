//! Deterministic offline provider.
//!
//! Derives a stable pseudo-embedding from the blake3 hash of the text,
//! so the same text always maps to the same vector without any network.
//! Specific texts can be pinned to chosen vectors, which is how tests
//! choreograph similarity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use engram_core::errors::EmbeddingError;
use engram_core::traits::IEmbeddingProvider;
use engram_core::EngramResult;

pub struct StaticProvider {
    dimensions: usize,
    pinned: HashMap<String, Vec<f32>>,
    available: AtomicBool,
}

impl StaticProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            pinned: HashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Pin a text to a chosen vector. The vector's length becomes the
    /// caller's responsibility; it is returned as given.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.into(), vector);
        self
    }

    /// Simulate the provider going down or recovering.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Hash-derived vector: each component is a hash byte mapped into
    /// [-1, 1]. Never zero-norm, since no byte maps exactly to 0.
    fn derived(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let bytes = hash.as_bytes();
        (0..self.dimensions)
            .map(|i| (bytes[i % bytes.len()] as f32) / 127.5 - 1.0)
            .collect()
    }

    fn lookup(&self, text: &str) -> EngramResult<Vec<f32>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.name().to_string(),
                reason: "provider marked unavailable".to_string(),
            }
            .into());
        }
        Ok(self
            .pinned
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.derived(text)))
    }
}

impl IEmbeddingProvider for StaticProvider {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        self.lookup(text)
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.lookup(text)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "static"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
