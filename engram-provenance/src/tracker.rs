//! Tracker over durable provenance rows with a bounded lookup cache.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use engram_core::errors::IndexError;
use engram_core::models::{Chunk, ProvenanceRecord};
use engram_core::traits::IContentStore;
use engram_core::EngramResult;

use crate::lru::LruCache;

/// Records where chunks came from and answers span-of-origin lookups.
///
/// Rows are durable in the content store; the LRU in front of it only
/// bounds lookup cost. An evicted entry is never lost, it just falls
/// back to storage on the next lookup.
pub struct ProvenanceTracker<S> {
    store: S,
    cache: Mutex<LruCache>,
    cache_capacity: usize,
}

impl<S: IContentStore> ProvenanceTracker<S> {
    pub fn new(store: S, cache_capacity: usize) -> Self {
        Self {
            store,
            cache: Mutex::new(LruCache::new(cache_capacity)),
            cache_capacity: cache_capacity.max(1),
        }
    }

    /// Build the row [`track`](Self::track) would persist, without
    /// persisting it. Ingestion writes these rows inside the document
    /// transaction and warms the cache afterwards via
    /// [`warm`](Self::warm).
    pub fn row_for(&self, chunk: &Chunk, confidence: f32) -> ProvenanceRecord {
        ProvenanceRecord {
            chunk_id: chunk.chunk_id,
            source_id: chunk.source_id,
            start_offset: chunk.start_offset,
            end_offset: chunk.end_offset,
            confidence: confidence.clamp(0.0, 1.0),
            tracked_at: Utc::now(),
        }
    }

    /// Persist a chunk's span of origin and warm the cache with it.
    pub fn track(&self, chunk: &Chunk, confidence: f32) -> EngramResult<ProvenanceRecord> {
        let record = self.row_for(chunk, confidence);
        self.store.append_provenance(std::slice::from_ref(&record))?;
        self.lock()?.insert(record.clone());
        Ok(record)
    }

    /// Admit already-persisted rows into the cache.
    pub fn warm(&self, rows: &[ProvenanceRecord]) -> EngramResult<()> {
        let mut cache = self.lock()?;
        for row in rows {
            cache.insert(row.clone());
        }
        Ok(())
    }

    /// Cache hit, else storage fallback. A fallback hit warms the cache
    /// for the next lookup; a miss in both is `Ok(None)`.
    pub fn get(&self, chunk_id: Uuid) -> EngramResult<Option<ProvenanceRecord>> {
        if let Some(hit) = self.lock()?.get(chunk_id) {
            debug!(%chunk_id, "provenance cache hit");
            return Ok(Some(hit));
        }

        match self.store.provenance_for_chunk(chunk_id)? {
            Some(record) => {
                self.lock()?.insert(record.clone());
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Number of rows currently cached.
    pub fn len(&self) -> EngramResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn capacity(&self) -> usize {
        self.cache_capacity
    }

    fn lock(&self) -> EngramResult<MutexGuard<'_, LruCache>> {
        self.cache.lock().map_err(|e| {
            IndexError::LockPoisoned {
                details: format!("provenance cache lock: {e}"),
            }
            .into()
        })
    }
}
