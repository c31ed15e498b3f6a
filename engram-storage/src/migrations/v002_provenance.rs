//! v002: Provenance rows mapping chunks back to source spans.

pub const MIGRATION_SQL: &str = "
    CREATE TABLE IF NOT EXISTS provenance (
        chunk_id      TEXT PRIMARY KEY,
        source_id     TEXT NOT NULL,
        start_offset  INTEGER NOT NULL,
        end_offset    INTEGER NOT NULL,
        confidence    REAL NOT NULL,
        tracked_at    TEXT NOT NULL,
        FOREIGN KEY (source_id) REFERENCES records(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_provenance_source ON provenance(source_id);
";
