/// Errors raised by the lexical and vector indexes.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A vector of the wrong width was presented. Rejected outright; the
    /// index never pads or truncates.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Zero-norm or non-finite vectors cannot be normalized for cosine
    /// similarity.
    #[error("invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("snapshot format version {found} is not supported (expected {expected})")]
    SnapshotVersion { expected: u32, found: u32 },

    #[error("snapshot corrupted: {details}")]
    SnapshotCorrupted { details: String },

    #[error("snapshot I/O failed: {message}")]
    SnapshotIo { message: String },

    #[error("index lock poisoned: {details}")]
    LockPoisoned { details: String },
}

impl From<std::io::Error> for IndexError {
    fn from(err: std::io::Error) -> Self {
        IndexError::SnapshotIo {
            message: err.to_string(),
        }
    }
}
