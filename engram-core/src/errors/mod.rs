//! Per-subsystem error enums plus the unified [`EngramError`].
//!
//! Lookups that can legitimately miss return `Ok(None)` rather than an
//! error variant; only genuine failures surface here.

mod config_error;
mod embedding_error;
mod index_error;
mod storage_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use index_error::IndexError;
pub use storage_error::StorageError;

/// Unified error type. Subsystem errors convert in via `#[from]` so `?`
/// works across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the workspace.
pub type EngramResult<T> = Result<T, EngramError>;
