//! Text → vector with caching and degraded-mode fallback.
//!
//! The service is the only caller of the remote embedding backend. Every
//! failure path (rate limit exhausted, network error, malformed response)
//! degrades locally to the deterministic hash embedding so the rest of the
//! pipeline never has to special-case a missing vector.

use std::sync::Arc;

use tracing::{debug, warn};

use faqdb_core::config::SearchConfig;
use faqdb_core::traits::EmbeddingBackend;
use faqdb_core::{Error, Result};

use crate::cache::EmbeddingCache;
use crate::hash::hash_embedding;
use crate::ratelimit::RateLimiter;

/// Whether a vector came from the real model or the hash fallback.
///
/// Degraded vectors are deterministic placeholders; similarity scores
/// computed from them are not semantic and must not be blended with real
/// rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trust {
    Semantic,
    Degraded,
}

#[derive(Debug, Clone)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub trust: Trust,
}

impl Embedding {
    pub fn is_degraded(&self) -> bool {
        self.trust == Trust::Degraded
    }
}

pub struct EmbeddingService {
    backend: Arc<dyn EmbeddingBackend>,
    cache: EmbeddingCache,
    limiter: Arc<RateLimiter>,
    provider: String,
    dimension: usize,
}

impl EmbeddingService {
    pub fn new(
        backend: Arc<dyn EmbeddingBackend>,
        limiter: Arc<RateLimiter>,
        provider: impl Into<String>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            backend,
            cache: EmbeddingCache::new(config.cache_size, config.cache_ttl()),
            limiter,
            provider: provider.into(),
            dimension: config.embedding_dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Generate an embedding for one text.
    ///
    /// Blank input is the only error. Cache hits are promoted and keep the
    /// trust flag they were stored with; misses go to the backend when the
    /// rate limiter allows it, and otherwise fall back to the hash vector.
    pub async fn generate(&self, text: &str) -> Result<Embedding> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some((vector, trust)) = self.cache.get(trimmed) {
            debug!(provider = %self.provider, "embedding cache hit");
            return Ok(Embedding { vector, trust });
        }
        if !self.limiter.check(&self.provider) {
            warn!(provider = %self.provider, "rate limit exhausted, degrading to hash embedding");
            return Ok(self.degrade(trimmed));
        }
        match self.backend.embed(trimmed).await {
            Ok(vector) if vector.len() == self.dimension => {
                self.cache.put(trimmed, vector.clone(), Trust::Semantic);
                Ok(Embedding { vector, trust: Trust::Semantic })
            }
            Ok(vector) => {
                warn!(
                    provider = %self.provider,
                    got = vector.len(),
                    expected = self.dimension,
                    "backend returned wrong dimension, degrading to hash embedding"
                );
                Ok(self.degrade(trimmed))
            }
            Err(e) => {
                warn!(provider = %self.provider, error = %e, "embedding backend failed, degrading to hash embedding");
                Ok(self.degrade(trimmed))
            }
        }
    }

    /// Generate embeddings for a batch, one backend call for all misses.
    ///
    /// On backend failure every miss in the batch falls back to the hash
    /// embedding; cache hits keep their stored trust.
    pub async fn generate_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let mut out: Vec<Option<Embedding>> = vec![None; texts.len()];
        let mut miss_indices = Vec::new();
        let mut miss_texts = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(Error::EmptyInput);
            }
            if let Some((vector, trust)) = self.cache.get(trimmed) {
                out[i] = Some(Embedding { vector, trust });
            } else {
                miss_indices.push(i);
                miss_texts.push(trimmed.to_string());
            }
        }

        if !miss_texts.is_empty() {
            if self.limiter.check(&self.provider) {
                match self.backend.embed_batch(&miss_texts).await {
                    Ok(vectors)
                        if vectors.len() == miss_texts.len()
                            && vectors.iter().all(|v| v.len() == self.dimension) =>
                    {
                        for (j, &i) in miss_indices.iter().enumerate() {
                            self.cache.put(&miss_texts[j], vectors[j].clone(), Trust::Semantic);
                            out[i] = Some(Embedding {
                                vector: vectors[j].clone(),
                                trust: Trust::Semantic,
                            });
                        }
                    }
                    Ok(_) => {
                        warn!(provider = %self.provider, "backend returned malformed batch, degrading whole batch");
                        for (j, &i) in miss_indices.iter().enumerate() {
                            out[i] = Some(self.degrade(&miss_texts[j]));
                        }
                    }
                    Err(e) => {
                        warn!(provider = %self.provider, error = %e, "batch embedding failed, degrading whole batch");
                        for (j, &i) in miss_indices.iter().enumerate() {
                            out[i] = Some(self.degrade(&miss_texts[j]));
                        }
                    }
                }
            } else {
                warn!(provider = %self.provider, "rate limit exhausted, degrading whole batch");
                for (j, &i) in miss_indices.iter().enumerate() {
                    out[i] = Some(self.degrade(&miss_texts[j]));
                }
            }
        }

        Ok(out
            .into_iter()
            .map(|e| e.expect("every slot filled above"))
            .collect())
    }

    /// Deterministic hash fallback, cached so repeated failures for the same
    /// text stay cheap.
    fn degrade(&self, trimmed: &str) -> Embedding {
        let vector = hash_embedding(trimmed, self.dimension);
        self.cache.put(trimmed, vector.clone(), Trust::Degraded);
        Embedding { vector, trust: Trust::Degraded }
    }
}
