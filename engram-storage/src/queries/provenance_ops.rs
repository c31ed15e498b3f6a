//! Provenance rows: one per chunk, written at ingestion.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use engram_core::models::ProvenanceRecord;
use engram_core::EngramResult;

use crate::queries::{parse_datetime, parse_uuid};
use crate::to_storage_err;

const PROVENANCE_COLUMNS: &str =
    "chunk_id, source_id, start_offset, end_offset, confidence, tracked_at";

/// Insert provenance rows. Re-tracking a chunk replaces its row, which
/// keeps retried ingestion idempotent.
pub fn insert_provenance(conn: &Connection, rows: &[ProvenanceRecord]) -> EngramResult<()> {
    for row in rows {
        conn.execute(
            "INSERT OR REPLACE INTO provenance
                 (chunk_id, source_id, start_offset, end_offset, confidence, tracked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.chunk_id.to_string(),
                row.source_id.to_string(),
                row.start_offset,
                row.end_offset,
                row.confidence,
                row.tracked_at.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(format!("insert_provenance: {e}")))?;
    }
    Ok(())
}

pub fn provenance_for_chunk(
    conn: &Connection,
    chunk_id: Uuid,
) -> EngramResult<Option<ProvenanceRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PROVENANCE_COLUMNS} FROM provenance WHERE chunk_id = ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![chunk_id.to_string()], |row| Ok(row_to_provenance(row)))
        .optional()
        .map_err(|e| to_storage_err(format!("provenance_for_chunk: {e}")))?
        .transpose()
}

fn row_to_provenance(row: &rusqlite::Row<'_>) -> EngramResult<ProvenanceRecord> {
    let chunk_id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let source_id: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let start_offset: u32 = row.get(2).map_err(|e| to_storage_err(e.to_string()))?;
    let end_offset: u32 = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let confidence: f64 = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let tracked_at: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ProvenanceRecord {
        chunk_id: parse_uuid(&chunk_id)?,
        source_id: parse_uuid(&source_id)?,
        start_offset,
        end_offset,
        confidence: confidence as f32,
        tracked_at: parse_datetime(&tracked_at)?,
    })
}
