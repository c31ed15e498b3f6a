//! Chunk queries: the indexing and retrieval layers read chunks through
//! these, never through raw SQL of their own.

use rusqlite::{params, Connection};
use uuid::Uuid;

use engram_core::models::{CandidateChunk, Chunk};
use engram_core::EngramResult;

use crate::queries::{parse_datetime, parse_uuid};
use crate::to_storage_err;

const CHUNK_COLUMNS: &str =
    "chunk_id, source_id, chunk_index, text, start_offset, end_offset, embedding_ref";

pub fn insert_chunks(conn: &Connection, chunks: &[Chunk]) -> EngramResult<()> {
    for chunk in chunks {
        conn.execute(
            "INSERT INTO chunks (chunk_id, source_id, chunk_index, text,
                                 start_offset, end_offset, embedding_ref)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                chunk.chunk_id.to_string(),
                chunk.source_id.to_string(),
                chunk.chunk_index,
                chunk.text,
                chunk.start_offset,
                chunk.end_offset,
                chunk.embedding_ref.map(|id| id.to_string()),
            ],
        )
        .map_err(|e| to_storage_err(format!("insert_chunks: {e}")))?;
    }
    Ok(())
}

/// A source's chunks ordered by `chunk_index`.
pub fn chunks_for_source(conn: &Connection, source_id: Uuid) -> EngramResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CHUNK_COLUMNS} FROM chunks WHERE source_id = ?1 ORDER BY chunk_index ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_chunks(stmt.query_map(params![source_id.to_string()], |row| Ok(row_to_chunk(row))))
}

/// Every chunk in the store, in insertion order. Feeds the lexical
/// rebuild at open.
pub fn all_chunks(conn: &Connection) -> EngramResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {CHUNK_COLUMNS} FROM chunks ORDER BY rowid ASC"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_chunks(stmt.query_map([], |row| Ok(row_to_chunk(row))))
}

pub fn chunk_count(conn: &Connection) -> EngramResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
        .map_err(|e| to_storage_err(format!("chunk_count: {e}")))?;
    Ok(count as usize)
}

/// Chunks joined with their record context, one query per candidate
/// batch. Ids with no matching chunk are skipped, so the result may be
/// shorter than `ids`. Order is not significant; ranking re-sorts.
pub fn candidates_by_ids(conn: &Connection, ids: &[Uuid]) -> EngramResult<Vec<CandidateChunk>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT c.chunk_id, c.source_id, c.chunk_index, c.text,
                c.start_offset, c.end_offset, c.embedding_ref,
                c.access_count, r.created_at, r.archived
         FROM chunks c
         JOIN records r ON r.id = c.source_id
         WHERE c.chunk_id IN ({})",
        placeholders.join(", ")
    );

    let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = id_strings
        .iter()
        .map(|s| s as &dyn rusqlite::types::ToSql)
        .collect();

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| Ok(row_to_candidate(row)))
        .map_err(|e| to_storage_err(format!("candidates_by_ids: {e}")))?;

    let mut candidates = Vec::new();
    for row in rows {
        candidates.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(candidates)
}

/// Chunks with no vector entry yet, oldest first. The embedding
/// backfill drains these in batches.
pub fn chunks_missing_embedding(conn: &Connection, limit: usize) -> EngramResult<Vec<Chunk>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CHUNK_COLUMNS} FROM chunks
             WHERE embedding_ref IS NULL ORDER BY rowid ASC LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_chunks(stmt.query_map(params![limit as i64], |row| Ok(row_to_chunk(row))))
}

/// Mark chunks as embedded by pointing `embedding_ref` at the chunk's
/// own id.
pub fn mark_embedded(conn: &Connection, chunk_ids: &[Uuid]) -> EngramResult<()> {
    for chunk_id in chunk_ids {
        conn.execute(
            "UPDATE chunks SET embedding_ref = chunk_id WHERE chunk_id = ?1",
            params![chunk_id.to_string()],
        )
        .map_err(|e| to_storage_err(format!("mark_embedded: {e}")))?;
    }
    Ok(())
}

/// Bump access counts for chunks returned from a query.
pub fn record_access(conn: &Connection, chunk_ids: &[Uuid]) -> EngramResult<()> {
    for chunk_id in chunk_ids {
        conn.execute(
            "UPDATE chunks SET access_count = access_count + 1 WHERE chunk_id = ?1",
            params![chunk_id.to_string()],
        )
        .map_err(|e| to_storage_err(format!("record_access: {e}")))?;
    }
    Ok(())
}

fn collect_chunks<I>(rows: rusqlite::Result<I>) -> EngramResult<Vec<Chunk>>
where
    I: Iterator<Item = rusqlite::Result<EngramResult<Chunk>>>,
{
    let rows = rows.map_err(|e| to_storage_err(e.to_string()))?;
    let mut chunks = Vec::new();
    for row in rows {
        chunks.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(chunks)
}

pub(crate) fn row_to_chunk(row: &rusqlite::Row<'_>) -> EngramResult<Chunk> {
    let chunk_id: String = row.get(0).map_err(|e| to_storage_err(e.to_string()))?;
    let source_id: String = row.get(1).map_err(|e| to_storage_err(e.to_string()))?;
    let chunk_index: u32 = row.get(2).map_err(|e| to_storage_err(e.to_string()))?;
    let text: String = row.get(3).map_err(|e| to_storage_err(e.to_string()))?;
    let start_offset: u32 = row.get(4).map_err(|e| to_storage_err(e.to_string()))?;
    let end_offset: u32 = row.get(5).map_err(|e| to_storage_err(e.to_string()))?;
    let embedding_ref: Option<String> = row.get(6).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(Chunk {
        chunk_id: parse_uuid(&chunk_id)?,
        source_id: parse_uuid(&source_id)?,
        text,
        start_offset,
        end_offset,
        chunk_index,
        embedding_ref: embedding_ref.as_deref().map(parse_uuid).transpose()?,
    })
}

/// Candidate rows reuse the chunk column order, then append the record
/// context columns.
fn row_to_candidate(row: &rusqlite::Row<'_>) -> EngramResult<CandidateChunk> {
    let chunk = row_to_chunk(row)?;
    let access_count: i64 = row.get(7).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at: String = row.get(8).map_err(|e| to_storage_err(e.to_string()))?;
    let archived: i32 = row.get(9).map_err(|e| to_storage_err(e.to_string()))?;

    Ok(CandidateChunk {
        chunk,
        created_at: parse_datetime(&created_at)?,
        access_count: access_count as u64,
        archived: archived != 0,
    })
}
