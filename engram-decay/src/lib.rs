//! # engram-decay
//!
//! Time-decay scoring: pure functions of age and access count, no I/O
//! and no mutable state. Scores are recomputed per query and never
//! persisted.

pub mod archival;
pub mod engine;
pub mod formula;

pub use archival::ArchivalDecision;
pub use engine::DecayEngine;
pub use formula::DecayBreakdown;
