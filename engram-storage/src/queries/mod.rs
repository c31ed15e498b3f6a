//! Query modules: free functions over a `&Connection`, so the same code
//! runs on a pooled reader, the writer, or inside a transaction.

pub mod chunk_ops;
pub mod provenance_ops;
pub mod record_ops;

use chrono::{DateTime, Utc};
use engram_core::errors::StorageError;
use engram_core::EngramResult;
use uuid::Uuid;

/// Parse a stored uuid column. Malformed data is corruption, not a
/// driver error.
pub(crate) fn parse_uuid(s: &str) -> EngramResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        StorageError::CorruptionDetected {
            details: format!("bad uuid '{s}': {e}"),
        }
        .into()
    })
}

/// Parse a stored RFC 3339 timestamp column.
pub(crate) fn parse_datetime(s: &str) -> EngramResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            StorageError::CorruptionDetected {
                details: format!("bad timestamp '{s}': {e}"),
            }
            .into()
        })
}
