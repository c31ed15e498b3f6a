//! # engram
//!
//! The assembled memory engine: a durable SQLite content store, a
//! sentence-respecting chunker, BM25 and HNSW indexes fused into hybrid
//! retrieval, decay-driven soft forgetting, and span-exact provenance,
//! all behind one handle.
//!
//! ```no_run
//! use engram::{EngramConfig, IngestRequest, MemoryEngine, RecordKind, SearchRequest};
//!
//! # fn main() -> engram::EngramResult<()> {
//! let engine = MemoryEngine::open(EngramConfig::default())?;
//! engine.ingest(IngestRequest::text(
//!     RecordKind::Document,
//!     "Paris is the capital of France. It has the Eiffel Tower.",
//! ))?;
//! let outcome = engine.query(SearchRequest {
//!     text: "capital of France".into(),
//!     embedding: None,
//!     k: 3,
//!     budget_chars: 2_000,
//!     ef: None,
//! })?;
//! println!("{} results", outcome.results.len());
//! # Ok(())
//! # }
//! ```

mod engine;
pub mod telemetry;

pub use engine::MemoryEngine;

pub use engram_core::config::EngramConfig;
pub use engram_core::errors::{ConfigError, EmbeddingError, EngramError, EngramResult, IndexError};
pub use engram_core::models::{
    EngineStats, IngestReceipt, IngestRequest, Payload, ProvenanceRecord, RankedResult, Record,
    RecordKind, SearchOutcome, SearchRequest, SignalScores,
};
pub use engram_core::traits::IEmbeddingProvider;
pub use engram_decay::ArchivalDecision;
pub use engram_embeddings::{CachedProvider, HttpEmbeddingClient, StaticProvider};
