//! Per-subsystem config structs with defaults from [`defaults`].

pub mod defaults;

mod chunker_config;
mod decay_config;
mod embedding_config;
mod engram_config;
mod lexical_config;
mod provenance_config;
mod retrieval_config;
mod storage_config;
mod vector_config;

pub use chunker_config::ChunkerConfig;
pub use decay_config::{DecayConfig, DecayStrategy};
pub use embedding_config::EmbeddingConfig;
pub use engram_config::EngramConfig;
pub use lexical_config::LexicalConfig;
pub use provenance_config::ProvenanceConfig;
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;
pub use vector_config::VectorConfig;
