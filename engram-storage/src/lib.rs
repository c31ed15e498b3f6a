//! # engram-storage
//!
//! SQLite-backed content store. A single write connection serializes all
//! mutations; a small pool of read-only connections serves lookups
//! concurrently under WAL. Records, chunks, and provenance rows live in
//! one database file and are written transactionally.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use engram_core::errors::StorageError;
use engram_core::EngramError;

/// Wrap a low-level SQLite failure message in the storage error type.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}
