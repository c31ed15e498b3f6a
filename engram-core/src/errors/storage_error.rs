/// Storage-layer errors for SQLite operations.
///
/// These are fatal to the operation that raised them and are surfaced to
/// the caller unchanged. The store never silently drops a write.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("database corruption detected: {details}")]
    CorruptionDetected { details: String },
}
