//! HTTP embedding client.
//!
//! POSTs `{base_url}/embed` with `{"input": [text, …]}` and expects
//! `{"embeddings": [[f32, …], …]}` back, one vector per input text in
//! order. Transient failures (transport errors, 5xx) are retried with
//! exponential backoff; client errors and timeouts are not.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use engram_core::config::EmbeddingConfig;
use engram_core::errors::EmbeddingError;
use engram_core::traits::IEmbeddingProvider;
use engram_core::EngramResult;

/// Delay before the first retry; doubles on each subsequent one.
const RETRY_BASE_DELAY_MS: u64 = 200;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Client for a network embedding endpoint.
pub struct HttpEmbeddingClient {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_ms: u64,
    max_retries: u32,
    batch_size: usize,
    /// 0 until the first successful response reveals the dimension.
    dimensions: AtomicUsize,
    available: AtomicBool,
}

impl HttpEmbeddingClient {
    /// Build a client for `base_url`. `dimensions` may be declared up
    /// front; otherwise it is learned from the first response. Every
    /// later response must agree with it.
    pub fn new(
        base_url: String,
        dimensions: Option<usize>,
        config: &EmbeddingConfig,
    ) -> EngramResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
            max_retries: config.max_retries,
            batch_size: config.batch_size.max(1),
            dimensions: AtomicUsize::new(dimensions.unwrap_or(0)),
            available: AtomicBool::new(true),
        })
    }

    fn request_embeddings(&self, input: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embed", self.base_url);
        let request = EmbedRequest { input };
        let mut last_error: Option<String> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay_ms = RETRY_BASE_DELAY_MS << (attempt - 1);
                warn!(attempt, delay_ms, "retrying embedding request");
                std::thread::sleep(Duration::from_millis(delay_ms));
            }

            let response = match self.client.post(&url).json(&request).send() {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    self.available.store(false, Ordering::Relaxed);
                    return Err(EmbeddingError::Timeout {
                        provider: self.base_url.clone(),
                        elapsed_ms: self.timeout_ms,
                    }
                    .into());
                }
                Err(e) => {
                    last_error = Some(format!("transport error: {e}"));
                    continue;
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, texts = input.len(), "embedding response");

            if status.is_success() {
                let parsed: EmbedResponse =
                    response.json().map_err(|e| EmbeddingError::InvalidResponse {
                        reason: format!("bad embedding JSON: {e}"),
                    })?;
                return self.accept(parsed, input.len());
            }

            if status.is_server_error() && attempt < self.max_retries {
                last_error = Some(format!("server returned {status}"));
                continue;
            }

            // Client error, or a server error with retries exhausted.
            self.available.store(false, Ordering::Relaxed);
            let body = response.text().unwrap_or_default();
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.base_url.clone(),
                reason: format!("{status}: {body}"),
            }
            .into());
        }

        self.available.store(false, Ordering::Relaxed);
        Err(EmbeddingError::ProviderUnavailable {
            provider: self.base_url.clone(),
            reason: last_error.unwrap_or_else(|| "retries exhausted".to_string()),
        }
        .into())
    }

    /// Validate a response before handing it to the caller. Vector
    /// counts and dimensions are checked here; a short or ragged
    /// response is never padded into shape.
    fn accept(&self, response: EmbedResponse, expected: usize) -> EngramResult<Vec<Vec<f32>>> {
        if response.embeddings.len() != expected {
            return Err(EmbeddingError::InvalidResponse {
                reason: format!(
                    "asked for {expected} embeddings, got {}",
                    response.embeddings.len()
                ),
            }
            .into());
        }

        if let Some(first) = response.embeddings.first() {
            let dims = first.len();
            if dims == 0 {
                return Err(EmbeddingError::InvalidResponse {
                    reason: "empty embedding vector".to_string(),
                }
                .into());
            }
            if response.embeddings.iter().any(|v| v.len() != dims) {
                return Err(EmbeddingError::InvalidResponse {
                    reason: "mixed embedding dimensions in one response".to_string(),
                }
                .into());
            }
            let known = self.dimensions.load(Ordering::Relaxed);
            if known != 0 && known != dims {
                return Err(EmbeddingError::InvalidResponse {
                    reason: format!("provider returned {dims}-dimensional vectors, expected {known}"),
                }
                .into());
            }
            self.dimensions.store(dims, Ordering::Relaxed);
        }

        self.available.store(true, Ordering::Relaxed);
        Ok(response.embeddings)
    }
}

impl IEmbeddingProvider for HttpEmbeddingClient {
    fn embed(&self, text: &str) -> EngramResult<Vec<f32>> {
        let mut results = self.request_embeddings(&[text.to_string()])?;
        results.pop().ok_or_else(|| {
            EmbeddingError::InvalidResponse {
                reason: "empty response for a single text".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> EngramResult<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            all.extend(self.request_embeddings(batch)?);
        }
        Ok(all)
    }

    fn dimensions(&self) -> usize {
        self.dimensions.load(Ordering::Relaxed)
    }

    fn name(&self) -> &str {
        &self.base_url
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
