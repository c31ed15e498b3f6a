//! Data model shared across the workspace.

mod chunk;
mod ingest;
mod provenance;
mod record;
mod search;
mod stats;

pub use chunk::{CandidateChunk, Chunk};
pub use ingest::{IngestReceipt, IngestRequest};
pub use provenance::ProvenanceRecord;
pub use record::{Payload, Record, RecordFilter, RecordKind};
pub use search::{RankedResult, SearchOutcome, SearchRequest, SignalScores};
pub use stats::EngineStats;
