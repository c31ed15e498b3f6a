//! # engram-provenance
//!
//! Span-of-origin tracking for chunks. Every chunk gets exactly one
//! provenance row at ingestion; lookups go through a fixed-capacity LRU
//! so audit queries stay O(1) in memory no matter how large the store
//! grows.

mod lru;
mod tracker;

pub use tracker::ProvenanceTracker;
