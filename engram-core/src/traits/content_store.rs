use std::sync::Arc;

use uuid::Uuid;

use crate::errors::EngramResult;
use crate::models::{CandidateChunk, Chunk, ProvenanceRecord, Record, RecordFilter};

/// Durable content storage: records, their chunks, and provenance rows.
///
/// Writes are durable before the call returns. Lookups that miss return
/// `Ok(None)`; only genuine storage failures are errors.
pub trait IContentStore: Send + Sync {
    // --- Records ---
    /// Append a bare record. Returns its id.
    fn append(&self, record: &Record) -> EngramResult<Uuid>;
    /// Append a record together with its chunks and provenance rows in
    /// one transaction. Either everything lands or nothing does.
    fn append_document(
        &self,
        record: &Record,
        chunks: &[Chunk],
        provenance: &[ProvenanceRecord],
    ) -> EngramResult<Uuid>;
    fn get(&self, id: Uuid) -> EngramResult<Option<Record>>;
    /// Records matching `filter`, ordered by `created_at` ascending.
    fn query(&self, filter: &RecordFilter, limit: usize) -> EngramResult<Vec<Record>>;
    /// Flip the soft-archival flag. Returns false when the id is unknown.
    fn set_archived(&self, id: Uuid, archived: bool) -> EngramResult<bool>;
    fn record_count(&self) -> EngramResult<usize>;

    // --- Chunks ---
    /// A source's chunks ordered by `chunk_index`.
    fn chunks_for_source(&self, source_id: Uuid) -> EngramResult<Vec<Chunk>>;
    /// Every chunk in the store. Used to rebuild the lexical index at open.
    fn all_chunks(&self) -> EngramResult<Vec<Chunk>>;
    fn chunk_count(&self) -> EngramResult<usize>;
    /// Chunks joined with their record context, for ranking. Unknown ids
    /// are skipped.
    fn candidates_by_ids(&self, ids: &[Uuid]) -> EngramResult<Vec<CandidateChunk>>;
    /// Chunks with no vector entry yet, oldest first.
    fn chunks_missing_embedding(&self, limit: usize) -> EngramResult<Vec<Chunk>>;
    /// Set `embedding_ref` on chunks that just received a vector entry.
    fn mark_embedded(&self, chunk_ids: &[Uuid]) -> EngramResult<()>;
    /// Bump access counts for chunks returned from a query.
    fn record_access(&self, chunk_ids: &[Uuid]) -> EngramResult<()>;

    // --- Provenance ---
    fn append_provenance(&self, rows: &[ProvenanceRecord]) -> EngramResult<()>;
    fn provenance_for_chunk(&self, chunk_id: Uuid) -> EngramResult<Option<ProvenanceRecord>>;
}

/// Blanket impl: `Arc<T>` implements `IContentStore` by delegating to the
/// inner `T`, so `Arc<StorageEngine>` passes wherever `&dyn IContentStore`
/// is needed.
impl<T: IContentStore> IContentStore for Arc<T> {
    fn append(&self, record: &Record) -> EngramResult<Uuid> {
        (**self).append(record)
    }
    fn append_document(
        &self,
        record: &Record,
        chunks: &[Chunk],
        provenance: &[ProvenanceRecord],
    ) -> EngramResult<Uuid> {
        (**self).append_document(record, chunks, provenance)
    }
    fn get(&self, id: Uuid) -> EngramResult<Option<Record>> {
        (**self).get(id)
    }
    fn query(&self, filter: &RecordFilter, limit: usize) -> EngramResult<Vec<Record>> {
        (**self).query(filter, limit)
    }
    fn set_archived(&self, id: Uuid, archived: bool) -> EngramResult<bool> {
        (**self).set_archived(id, archived)
    }
    fn record_count(&self) -> EngramResult<usize> {
        (**self).record_count()
    }
    fn chunks_for_source(&self, source_id: Uuid) -> EngramResult<Vec<Chunk>> {
        (**self).chunks_for_source(source_id)
    }
    fn all_chunks(&self) -> EngramResult<Vec<Chunk>> {
        (**self).all_chunks()
    }
    fn chunk_count(&self) -> EngramResult<usize> {
        (**self).chunk_count()
    }
    fn candidates_by_ids(&self, ids: &[Uuid]) -> EngramResult<Vec<CandidateChunk>> {
        (**self).candidates_by_ids(ids)
    }
    fn chunks_missing_embedding(&self, limit: usize) -> EngramResult<Vec<Chunk>> {
        (**self).chunks_missing_embedding(limit)
    }
    fn mark_embedded(&self, chunk_ids: &[Uuid]) -> EngramResult<()> {
        (**self).mark_embedded(chunk_ids)
    }
    fn record_access(&self, chunk_ids: &[Uuid]) -> EngramResult<()> {
        (**self).record_access(chunk_ids)
    }
    fn append_provenance(&self, rows: &[ProvenanceRecord]) -> EngramResult<()> {
        (**self).append_provenance(rows)
    }
    fn provenance_for_chunk(&self, chunk_id: Uuid) -> EngramResult<Option<ProvenanceRecord>> {
        (**self).provenance_for_chunk(chunk_id)
    }
}
