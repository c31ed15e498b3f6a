//! Record CRUD: append, lookup, filtered query, soft archival.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use engram_core::errors::{EngramError, StorageError};
use engram_core::models::{Chunk, Payload, ProvenanceRecord, Record, RecordFilter, RecordKind};
use engram_core::EngramResult;

use crate::queries::{chunk_ops, parse_datetime, parse_uuid, provenance_ops};
use crate::to_storage_err;

const RECORD_COLUMNS: &str = "id, kind, payload, metadata, archived, created_at";

/// Insert a bare record. Ids are caller-supplied UUIDs and never reused,
/// so a duplicate id is an error, not an upsert.
pub fn insert_record(conn: &Connection, record: &Record) -> EngramResult<()> {
    let payload_json =
        serde_json::to_string(&record.payload).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json =
        serde_json::to_string(&record.metadata).map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO records (id, kind, payload, metadata, content_hash, archived, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.id.to_string(),
            record.kind.as_str(),
            payload_json,
            metadata_json,
            record.content_hash(),
            record.archived as i32,
            record.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_record: {e}")))?;
    Ok(())
}

/// Insert a record together with its chunks and provenance rows in one
/// transaction. Either everything lands or nothing does.
pub fn insert_document(
    conn: &Connection,
    record: &Record,
    chunks: &[Chunk],
    provenance: &[ProvenanceRecord],
) -> EngramResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("insert_document begin: {e}")))?;

    match insert_document_inner(&tx, record, chunks, provenance) {
        Ok(()) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("insert_document commit: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn insert_document_inner(
    conn: &Connection,
    record: &Record,
    chunks: &[Chunk],
    provenance: &[ProvenanceRecord],
) -> EngramResult<()> {
    insert_record(conn, record)?;
    chunk_ops::insert_chunks(conn, chunks)?;
    provenance_ops::insert_provenance(conn, provenance)?;
    Ok(())
}

pub fn get_record(conn: &Connection, id: Uuid) -> EngramResult<Option<Record>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"))
        .map_err(|e| to_storage_err(e.to_string()))?;

    stmt.query_row(params![id.to_string()], |row| Ok(row_to_record(row)))
        .optional()
        .map_err(|e| to_storage_err(format!("get_record: {e}")))?
        .transpose()
}

/// Records matching `filter`, ordered by `created_at` ascending. The
/// WHERE clause is assembled from the filter's set fields only.
pub fn query_records(
    conn: &Connection,
    filter: &RecordFilter,
    limit: usize,
) -> EngramResult<Vec<Record>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(kind) = filter.kind {
        values.push(Box::new(kind.as_str().to_string()));
        clauses.push(format!("kind = ?{}", values.len()));
    }
    if let Some((from, to)) = filter.time_range {
        values.push(Box::new(from.to_rfc3339()));
        clauses.push(format!("created_at >= ?{}", values.len()));
        values.push(Box::new(to.to_rfc3339()));
        clauses.push(format!("created_at < ?{}", values.len()));
    }
    if let Some(archived) = filter.archived {
        values.push(Box::new(archived as i32));
        clauses.push(format!("archived = ?{}", values.len()));
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    values.push(Box::new(limit as i64));
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM records{where_clause} \
         ORDER BY created_at ASC LIMIT ?{}",
        values.len()
    );

    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        values.iter().map(|v| v.as_ref()).collect();

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(format!("query_records: {e}")))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(records)
}

/// Flip the soft-archival flag. Returns false when the id is unknown.
pub fn set_archived(conn: &Connection, id: Uuid, archived: bool) -> EngramResult<bool> {
    let rows = conn
        .execute(
            "UPDATE records SET archived = ?2 WHERE id = ?1",
            params![id.to_string(), archived as i32],
        )
        .map_err(|e| to_storage_err(format!("set_archived: {e}")))?;
    Ok(rows > 0)
}

pub fn record_count(conn: &Connection) -> EngramResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
        .map_err(|e| to_storage_err(format!("record_count: {e}")))?;
    Ok(count as usize)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> EngramResult<Record> {
    let id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let kind: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let payload_json: String = row.get(2).map_err(|e| to_storage_err(e.to_string()))?;
    let metadata_json: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let archived: i32 = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;

    let payload: Payload = serde_json::from_str(&payload_json).map_err(|e| {
        EngramError::from(StorageError::CorruptionDetected {
            details: format!("bad payload json: {e}"),
        })
    })?;
    let metadata = serde_json::from_str(&metadata_json).map_err(|e| {
        EngramError::from(StorageError::CorruptionDetected {
            details: format!("bad metadata json: {e}"),
        })
    })?;

    Ok(Record {
        id: parse_uuid(&id)?,
        kind: parse_kind(&kind)?,
        payload,
        metadata,
        created_at: parse_datetime(&created_at)?,
        archived: archived != 0,
    })
}

fn parse_kind(s: &str) -> EngramResult<RecordKind> {
    match s {
        "event" => Ok(RecordKind::Event),
        "document" => Ok(RecordKind::Document),
        other => Err(StorageError::CorruptionDetected {
            details: format!("unknown record kind '{other}'"),
        }
        .into()),
    }
}
