/// Embedding provider errors.
///
/// Unavailability is explicit so callers can degrade to lexical-only
/// retrieval. A zero-vector substitute is never an acceptable fallback:
/// it makes every affected entry equally, spuriously similar.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("provider unavailable: {provider}: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("provider {provider} timed out after {elapsed_ms}ms")]
    Timeout { provider: String, elapsed_ms: u64 },

    #[error("malformed provider response: {reason}")]
    InvalidResponse { reason: String },
}
