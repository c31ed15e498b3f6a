//! MemoryEngine: owns every subsystem and exposes the public operations.
//!
//! Construction is fail-fast: the config is validated and every
//! subsystem built before the first operation runs. Ingestion does all
//! fallible work (chunking, embedding, validation) before any mutation,
//! writes the document in one storage transaction, then applies the
//! in-memory index updates; the stored document is the recovery source
//! for anything lost between commit and index update.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use engram_core::config::EngramConfig;
use engram_core::errors::{ConfigError, EngramResult, IndexError};
use engram_core::models::{
    Chunk, EngineStats, IngestReceipt, IngestRequest, ProvenanceRecord, Record, RecordFilter,
    SearchOutcome, SearchRequest,
};
use engram_core::traits::{IContentStore, IEmbeddingProvider};
use engram_chunker::{ChunkCut, Chunker};
use engram_decay::{archival, ArchivalDecision, DecayEngine};
use engram_embeddings::{CachedProvider, HttpEmbeddingClient};
use engram_lexical::LexicalIndex;
use engram_provenance::ProvenanceTracker;
use engram_retrieval::RetrievalEngine;
use engram_storage::StorageEngine;
use engram_vector::{HnswIndex, VectorMeta};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Provenance confidence for sentence-aligned chunk boundaries.
const SENTENCE_CONFIDENCE: f32 = 1.0;
/// Provenance confidence for hard character splits.
const HARD_SPLIT_CONFIDENCE: f32 = 0.85;
/// Characters of chunk text carried into vector-node metadata.
const PREVIEW_CHARS: usize = 80;
/// Oldest live records scored per archival sweep.
const SWEEP_LIMIT: usize = 10_000;

/// The assembled memory engine.
///
/// All operations take `&self`; the engine is `Send + Sync` and can sit
/// behind an `Arc` shared across threads.
pub struct MemoryEngine {
    config: EngramConfig,
    store: Arc<StorageEngine>,
    chunker: Chunker,
    lexical: LexicalIndex,
    vector: HnswIndex,
    decay: DecayEngine,
    tracker: ProvenanceTracker<Arc<StorageEngine>>,
    provider: Option<Arc<dyn IEmbeddingProvider>>,
}

impl std::fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("config", &self.config)
            .field("has_provider", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

impl MemoryEngine {
    /// Open the engine described by `config`. When
    /// `embedding.base_url` is set, an HTTP provider with an L1 cache is
    /// built from it; otherwise the engine runs lexical-only.
    pub fn open(config: EngramConfig) -> EngramResult<Self> {
        let provider = provider_from_config(&config)?;
        Self::open_with_provider(config, provider)
    }

    /// Open with a caller-supplied embedding provider (or none),
    /// bypassing the HTTP client the config would build.
    pub fn open_with_provider(
        config: EngramConfig,
        provider: Option<Arc<dyn IEmbeddingProvider>>,
    ) -> EngramResult<Self> {
        config.validate()?;

        // Storage
        let store = Arc::new(if config.storage.db_path == ":memory:" {
            StorageEngine::open_in_memory()?
        } else {
            StorageEngine::open(Path::new(&config.storage.db_path), &config.storage)?
        });

        // Chunker
        let chunker = Chunker::new(&config.chunker)?;

        // Lexical index lives in memory only; replay every stored chunk.
        let lexical = LexicalIndex::new(&config.lexical);
        let chunks = store.all_chunks()?;
        let replayed = chunks.len();
        for chunk in chunks {
            lexical.index(chunk.chunk_id, &chunk.text)?;
        }
        info!(chunks = replayed, "lexical index rebuilt");

        // Vector index, from snapshot when one exists.
        let vector = match &config.vector.snapshot_path {
            Some(path) if Path::new(path).exists() => {
                let index = HnswIndex::load(Path::new(path))?;
                let nodes = index.len()?;
                info!(path = %path, nodes, "vector snapshot loaded");
                index
            }
            _ => HnswIndex::new(&config.vector),
        };

        // Decay and provenance
        let decay = DecayEngine::new(config.decay.clone());
        let tracker = ProvenanceTracker::new(store.clone(), config.provenance.cache_capacity);

        if let Some(provider) = provider.as_deref() {
            info!(provider = provider.name(), "embedding provider configured");
        }

        Ok(Self {
            config,
            store,
            chunker,
            lexical,
            vector,
            decay,
            tracker,
            provider,
        })
    }

    pub fn config(&self) -> &EngramConfig {
        &self.config
    }

    /// Ingest one record. Text payloads are chunked, optionally
    /// embedded, stored in a single transaction, and indexed; byte
    /// payloads are stored opaque.
    ///
    /// An unavailable embedding provider degrades the ingest to
    /// lexical-only rather than failing it: chunks persist with no
    /// vector entry and `backfill_embeddings` completes the job later.
    pub fn ingest(&self, request: IngestRequest) -> EngramResult<IngestReceipt> {
        let record = Record::new(request.kind, request.payload, request.metadata);

        let cuts: Vec<ChunkCut> = match record.text() {
            Some(text) => self.chunker.chunk(record.id, text).collect(),
            None => Vec::new(),
        };
        if cuts.is_empty() {
            self.store.append(&record)?;
            info!(source_id = %record.id, "record ingested without chunks");
            return Ok(IngestReceipt {
                source_id: record.id,
                chunk_ids: Vec::new(),
                embedded_chunks: 0,
            });
        }

        // Fallible work first: embeddings are fetched and validated
        // before anything is written anywhere.
        let embeddings = match self.provider.as_deref() {
            Some(provider) => {
                let texts: Vec<String> = cuts.iter().map(|cut| cut.chunk.text.clone()).collect();
                match provider.embed_batch(&texts) {
                    Ok(vectors) => {
                        self.check_embeddings(&vectors)?;
                        Some(vectors)
                    }
                    Err(error) => {
                        warn!(%error, "embedding provider unavailable, ingesting lexically");
                        None
                    }
                }
            }
            None => None,
        };
        let embedded = embeddings.as_ref().map_or(0, Vec::len);

        let mut chunks: Vec<Chunk> = Vec::with_capacity(cuts.len());
        let mut rows: Vec<ProvenanceRecord> = Vec::with_capacity(cuts.len());
        for cut in &cuts {
            let mut chunk = cut.chunk.clone();
            if embeddings.is_some() {
                chunk.embedding_ref = Some(chunk.chunk_id);
            }
            let confidence = if cut.sentence_aligned {
                SENTENCE_CONFIDENCE
            } else {
                HARD_SPLIT_CONFIDENCE
            };
            rows.push(self.tracker.row_for(&chunk, confidence));
            chunks.push(chunk);
        }

        // One transaction: record, chunks, and provenance land together
        // or not at all.
        self.store.append_document(&record, &chunks, &rows)?;

        for chunk in &chunks {
            self.lexical.index(chunk.chunk_id, &chunk.text)?;
        }
        if let Some(vectors) = embeddings {
            for (chunk, vector) in chunks.iter().zip(vectors) {
                self.vector.add(chunk.chunk_id, vector, self.meta_for(chunk))?;
            }
        }
        self.tracker.warm(&rows)?;

        info!(
            source_id = %record.id,
            chunks = chunks.len(),
            embedded,
            "document ingested"
        );
        Ok(IngestReceipt {
            source_id: record.id,
            chunk_ids: chunks.iter().map(|c| c.chunk_id).collect(),
            embedded_chunks: embedded,
        })
    }

    /// Hybrid search. When the request carries no embedding and a
    /// provider is configured, the query text is embedded here; provider
    /// failure degrades the query to lexical-only instead of failing it.
    pub fn query(&self, request: SearchRequest) -> EngramResult<SearchOutcome> {
        let request = self.resolve_embedding(request);
        let retriever = RetrievalEngine::new(
            &self.store,
            &self.lexical,
            &self.vector,
            &self.decay,
            &self.tracker,
            self.config.retrieval.clone(),
        )
        .with_default_ef(self.config.vector.ef_search);
        retriever.search(&request)
    }

    /// Span-of-origin for a chunk. `Ok(None)` for unknown ids.
    pub fn get_provenance(&self, chunk_id: Uuid) -> EngramResult<Option<ProvenanceRecord>> {
        self.tracker.get(chunk_id)
    }

    /// Direct id lookup. Archived and decayed records stay reachable
    /// here even though default ranking excludes them.
    pub fn get_record(&self, id: Uuid) -> EngramResult<Option<Record>> {
        self.store.get(id)
    }

    /// Soft-archive a source: flips the stored flag, drops its chunks
    /// from the lexical index, and tombstones its vector entries.
    /// Returns `false` for unknown ids.
    pub fn archive(&self, source_id: Uuid) -> EngramResult<bool> {
        if !self.store.set_archived(source_id, true)? {
            return Ok(false);
        }
        for chunk in self.store.chunks_for_source(source_id)? {
            self.lexical.remove(chunk.chunk_id)?;
            self.vector.remove(chunk.chunk_id)?;
        }
        info!(%source_id, "source archived");
        Ok(true)
    }

    /// Embed up to `limit` chunks that have no vector entry yet, oldest
    /// first. Returns how many were embedded. Unlike ingestion this
    /// propagates provider errors: the caller asked for embeddings
    /// specifically, so an unavailable provider is a real failure here.
    pub fn backfill_embeddings(&self, limit: usize) -> EngramResult<usize> {
        let Some(provider) = self.provider.as_deref() else {
            debug!("no embedding provider configured, nothing to backfill");
            return Ok(0);
        };

        let chunks = self.store.chunks_missing_embedding(limit)?;
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = provider.embed_batch(&texts)?;
        self.check_embeddings(&vectors)?;

        for (chunk, vector) in chunks.iter().zip(vectors) {
            self.vector.add(chunk.chunk_id, vector, self.meta_for(chunk))?;
        }
        let ids: Vec<Uuid> = chunks.iter().map(|c| c.chunk_id).collect();
        self.store.mark_embedded(&ids)?;

        info!(embedded = ids.len(), "embedding backfill complete");
        Ok(ids.len())
    }

    /// Score the oldest live records against the decay threshold and
    /// soft-archive the expired ones. Returns every decision made, so
    /// callers can audit the sweep.
    pub fn evaluate_archival(&self) -> EngramResult<Vec<ArchivalDecision>> {
        let filter = RecordFilter {
            archived: Some(false),
            ..RecordFilter::default()
        };
        let records = self.store.query(&filter, SWEEP_LIMIT)?;
        let now = Utc::now();

        let mut decisions = Vec::with_capacity(records.len());
        for record in records {
            let chunk_ids: Vec<Uuid> = self
                .store
                .chunks_for_source(record.id)?
                .iter()
                .map(|c| c.chunk_id)
                .collect();
            // A document stays alive through its most-accessed chunk.
            let access = self
                .store
                .candidates_by_ids(&chunk_ids)?
                .iter()
                .map(|c| c.access_count)
                .max()
                .unwrap_or(0);
            let score = self.decay.score(record.created_at, access, now);
            let decision =
                archival::evaluate(record.id, record.archived, score, self.decay.threshold());
            if decision.should_archive {
                debug!(source_id = %record.id, score, "decay sweep archiving source");
                self.archive(record.id)?;
            }
            decisions.push(decision);
        }
        Ok(decisions)
    }

    /// Persist the vector index to the configured snapshot path.
    pub fn save_vector_snapshot(&self) -> EngramResult<()> {
        let Some(path) = &self.config.vector.snapshot_path else {
            return Err(ConfigError::invalid("vector.snapshot_path", "not configured").into());
        };
        self.vector.save(Path::new(path))
    }

    pub fn stats(&self) -> EngramResult<EngineStats> {
        Ok(EngineStats {
            records: self.store.record_count()?,
            chunks: self.store.chunk_count()?,
            lexical_docs: self.lexical.doc_count()?,
            lexical_terms: self.lexical.term_count()?,
            vector_nodes: self.vector.len()?,
            vector_dimension: self.vector.dimension()?,
            provenance_cached: self.tracker.len()?,
        })
    }

    fn resolve_embedding(&self, mut request: SearchRequest) -> SearchRequest {
        if request.embedding.is_some() || request.text.is_empty() {
            return request;
        }
        if let Some(provider) = self.provider.as_deref() {
            match provider.embed(&request.text) {
                Ok(embedding) => request.embedding = Some(embedding),
                Err(error) => {
                    warn!(%error, "query embedding failed, searching lexically");
                }
            }
        }
        request
    }

    /// Reject embeddings the vector index would refuse, before any of
    /// them is stored: wrong dimension, non-finite, or zero-norm.
    fn check_embeddings(&self, vectors: &[Vec<f32>]) -> EngramResult<()> {
        let expected = self
            .vector
            .dimension()?
            .or_else(|| vectors.first().map(Vec::len));
        for vector in vectors {
            if let Some(expected) = expected {
                if vector.len() != expected {
                    return Err(IndexError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    }
                    .into());
                }
            }
            let norm_sq: f32 = vector.iter().map(|x| x * x).sum();
            if !norm_sq.is_finite() {
                return Err(IndexError::InvalidVector {
                    reason: "non-finite component".to_string(),
                }
                .into());
            }
            if norm_sq == 0.0 {
                return Err(IndexError::InvalidVector {
                    reason: "zero-norm vector".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn meta_for(&self, chunk: &Chunk) -> VectorMeta {
        VectorMeta {
            source_id: chunk.source_id,
            content_preview: chunk.text.chars().take(PREVIEW_CHARS).collect(),
        }
    }
}

fn provider_from_config(
    config: &EngramConfig,
) -> EngramResult<Option<Arc<dyn IEmbeddingProvider>>> {
    let Some(base_url) = &config.embedding.base_url else {
        return Ok(None);
    };
    let client =
        HttpEmbeddingClient::new(base_url.clone(), config.vector.dimension, &config.embedding)?;
    Ok(Some(Arc::new(CachedProvider::new(client, &config.embedding))))
}
