//! faqdb-embed
//!
//! Embedding generation with LRU+TTL caching, a deterministic hash fallback
//! for degraded mode, the token-bucket rate limiter guarding the backend,
//! and the background embed worker used by write paths.

pub mod cache;
pub mod hash;
pub mod ratelimit;
pub mod service;
pub mod worker;

pub use cache::EmbeddingCache;
pub use hash::hash_embedding;
pub use ratelimit::RateLimiter;
pub use service::{Embedding, EmbeddingService, Trust};
pub use worker::{EmbedJob, EmbedOutcome, EmbedWorker};

use async_trait::async_trait;
use faqdb_core::traits::EmbeddingBackend;
use faqdb_core::Result;

/// Offline backend that serves the deterministic hash vectors directly.
///
/// Used by the CLI and tests when no real model is reachable.
pub struct HashEmbeddingBackend {
    dim: usize,
}

impl HashEmbeddingBackend {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbeddingBackend for HashEmbeddingBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hash_embedding(text, self.dim))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| hash_embedding(t, self.dim)).collect())
    }
}
