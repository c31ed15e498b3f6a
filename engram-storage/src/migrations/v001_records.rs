//! v001: Core tables, records and their chunks.

pub const MIGRATION_SQL: &str = "
    CREATE TABLE IF NOT EXISTS records (
        id            TEXT PRIMARY KEY,
        kind          TEXT NOT NULL,
        payload       TEXT NOT NULL,
        metadata      TEXT NOT NULL DEFAULT '{}',
        content_hash  TEXT NOT NULL,
        archived      INTEGER NOT NULL DEFAULT 0,
        created_at    TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_records_kind ON records(kind);
    CREATE INDEX IF NOT EXISTS idx_records_created_at ON records(created_at);
    CREATE INDEX IF NOT EXISTS idx_records_archived ON records(archived);

    CREATE TABLE IF NOT EXISTS chunks (
        chunk_id       TEXT PRIMARY KEY,
        source_id      TEXT NOT NULL,
        chunk_index    INTEGER NOT NULL,
        text           TEXT NOT NULL,
        start_offset   INTEGER NOT NULL,
        end_offset     INTEGER NOT NULL,
        embedding_ref  TEXT,
        access_count   INTEGER NOT NULL DEFAULT 0,
        UNIQUE (source_id, chunk_index),
        FOREIGN KEY (source_id) REFERENCES records(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source_id);
    CREATE INDEX IF NOT EXISTS idx_chunks_embedding_ref ON chunks(embedding_ref);
";
