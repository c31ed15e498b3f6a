//! # engram-retrieval
//!
//! Hybrid retrieval over the lexical and vector indexes. One query fans
//! out into concurrent BM25 and ANN sub-searches, their scores are
//! min-max normalized and fused, decay blends in recency, and the ranked
//! tail is cut to a result count and a character budget.
//!
//! The pipeline is read-only with respect to index content; the only
//! write it performs is a best-effort access-count bump for returned
//! chunks, and losing that bump never affects correctness.

mod budget;
mod engine;
mod fusion;

pub use engine::RetrievalEngine;
