//! # engram-embeddings
//!
//! Embedding provider boundary. The engine consumes vectors through the
//! [`IEmbeddingProvider`] trait; this crate supplies the HTTP client for
//! a network endpoint, a caching wrapper, and a deterministic offline
//! provider.
//!
//! Unavailability always surfaces as an explicit error. A zero-vector
//! substitute is never produced: it would make every affected entry
//! equally, spuriously similar.

pub mod cached;
pub mod http_client;
pub mod static_provider;

pub use cached::CachedProvider;
pub use http_client::HttpEmbeddingClient;
pub use static_provider::StaticProvider;

pub use engram_core::traits::IEmbeddingProvider;
