//! # engram-vector
//!
//! From-scratch HNSW index for cosine nearest-neighbor search. Nodes live
//! in an arena and reference each other by index, removal is tombstoning,
//! and the whole graph round-trips through a versioned snapshot file.

mod distance;
mod index;
mod node;
mod snapshot;

pub use index::HnswIndex;
pub use node::VectorMeta;
