//! Trait seams at the engine's boundaries.

mod content_store;
mod embedding;

pub use content_store::IContentStore;
pub use embedding::IEmbeddingProvider;
