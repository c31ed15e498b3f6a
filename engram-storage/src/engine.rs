//! Storage engine: owns the connection pool and implements the content
//! store contract on top of the query modules.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use engram_core::config::StorageConfig;
use engram_core::models::{CandidateChunk, Chunk, ProvenanceRecord, Record, RecordFilter};
use engram_core::traits::IContentStore;
use engram_core::EngramResult;

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{chunk_ops, provenance_ops, record_ops};

/// SQLite-backed content store.
///
/// Writes go through the single write connection; reads go through the
/// read pool. In-memory engines route reads through the writer too,
/// because in-memory readers would hold separate, empty databases.
pub struct StorageEngine {
    pool: ConnectionPool,
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open (creating if needed) the database at `path` and bring its
    /// schema up to date.
    pub fn open(path: &Path, config: &StorageConfig) -> EngramResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        info!(path = %path.display(), readers = engine.pool.readers.size(), "storage engine open");
        Ok(engine)
    }

    /// Open an in-memory engine. Used by tests and by callers that want
    /// a throwaway store.
    pub fn open_in_memory() -> EngramResult<Self> {
        let config = StorageConfig {
            read_pool_size: 1,
            ..StorageConfig::default()
        };
        let pool = ConnectionPool::open_in_memory(&config)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> EngramResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Current schema version, read from the database.
    pub fn schema_version(&self) -> EngramResult<u32> {
        self.with_reader(|conn| {
            migrations::current_version(conn).map_err(engram_core::errors::EngramError::from)
        })
    }

    fn with_reader<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }
}

impl IContentStore for StorageEngine {
    fn append(&self, record: &Record) -> EngramResult<Uuid> {
        self.pool
            .writer
            .with_conn(|conn| record_ops::insert_record(conn, record))?;
        Ok(record.id)
    }

    fn append_document(
        &self,
        record: &Record,
        chunks: &[Chunk],
        provenance: &[ProvenanceRecord],
    ) -> EngramResult<Uuid> {
        self.pool
            .writer
            .with_conn(|conn| record_ops::insert_document(conn, record, chunks, provenance))?;
        Ok(record.id)
    }

    fn get(&self, id: Uuid) -> EngramResult<Option<Record>> {
        self.with_reader(|conn| record_ops::get_record(conn, id))
    }

    fn query(&self, filter: &RecordFilter, limit: usize) -> EngramResult<Vec<Record>> {
        self.with_reader(|conn| record_ops::query_records(conn, filter, limit))
    }

    fn set_archived(&self, id: Uuid, archived: bool) -> EngramResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| record_ops::set_archived(conn, id, archived))
    }

    fn record_count(&self) -> EngramResult<usize> {
        self.with_reader(record_ops::record_count)
    }

    fn chunks_for_source(&self, source_id: Uuid) -> EngramResult<Vec<Chunk>> {
        self.with_reader(|conn| chunk_ops::chunks_for_source(conn, source_id))
    }

    fn all_chunks(&self) -> EngramResult<Vec<Chunk>> {
        self.with_reader(chunk_ops::all_chunks)
    }

    fn chunk_count(&self) -> EngramResult<usize> {
        self.with_reader(chunk_ops::chunk_count)
    }

    fn candidates_by_ids(&self, ids: &[Uuid]) -> EngramResult<Vec<CandidateChunk>> {
        self.with_reader(|conn| chunk_ops::candidates_by_ids(conn, ids))
    }

    fn chunks_missing_embedding(&self, limit: usize) -> EngramResult<Vec<Chunk>> {
        self.with_reader(|conn| chunk_ops::chunks_missing_embedding(conn, limit))
    }

    fn mark_embedded(&self, chunk_ids: &[Uuid]) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| chunk_ops::mark_embedded(conn, chunk_ids))
    }

    fn record_access(&self, chunk_ids: &[Uuid]) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| chunk_ops::record_access(conn, chunk_ids))
    }

    fn append_provenance(&self, rows: &[ProvenanceRecord]) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn(|conn| provenance_ops::insert_provenance(conn, rows))
    }

    fn provenance_for_chunk(&self, chunk_id: Uuid) -> EngramResult<Option<ProvenanceRecord>> {
        self.with_reader(|conn| provenance_ops::provenance_for_chunk(conn, chunk_id))
    }
}
