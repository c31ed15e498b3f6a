//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use engram_core::config::StorageConfig;
use engram_core::EngramResult;

use crate::to_storage_err;

/// Apply pragmas to the write connection. `synchronous = FULL` keeps the
/// durability contract: a committed append survives power loss.
pub fn apply_write_pragmas(conn: &Connection, config: &StorageConfig) -> EngramResult<()> {
    let journal_mode = if config.wal_mode { "WAL" } else { "DELETE" };
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = {journal_mode};
        PRAGMA synchronous = FULL;
        PRAGMA mmap_size = {};
        PRAGMA cache_size = {};
        PRAGMA busy_timeout = {};
        PRAGMA foreign_keys = ON;
        ",
        config.mmap_size, config.cache_size, config.busy_timeout_ms,
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Apply pragmas to a read connection.
pub fn apply_read_pragmas(conn: &Connection, config: &StorageConfig) -> EngramResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA mmap_size = {};
        PRAGMA cache_size = {};
        PRAGMA busy_timeout = {};
        PRAGMA foreign_keys = ON;
        ",
        config.mmap_size, config.cache_size, config.busy_timeout_ms,
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> EngramResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
