//! LRU + TTL cache for generated embeddings.
//!
//! Keyed by an `XxHash64` of the trimmed text. Entries remember whether they
//! hold a semantic or a degraded vector so a cached fallback never gains
//! confidence on a later hit; it only makes repeated failures cheap.

use std::hash::Hasher;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use twox_hash::XxHash64;

use crate::service::Trust;

struct CacheEntry {
    vector: Vec<f32>,
    trust: Trust,
    created: Instant,
}

pub struct EmbeddingCache {
    entries: Mutex<LruCache<u64, CacheEntry>>,
    ttl: Duration,
}

impl EmbeddingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .unwrap_or_else(|| NonZeroUsize::new(500).expect("default capacity is non-zero"));
        Self { entries: Mutex::new(LruCache::new(capacity)), ttl }
    }

    /// Stable key of the normalized text.
    pub fn key(text: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(text.trim().as_bytes());
        hasher.finish()
    }

    /// Fetch a live entry and promote it to most-recently-used. Expired
    /// entries are evicted on the spot.
    pub fn get(&self, text: &str) -> Option<(Vec<f32>, Trust)> {
        let key = Self::key(text);
        let mut entries = self.lock();
        match entries.get(&key) {
            Some(entry) if entry.created.elapsed() <= self.ttl => {
                Some((entry.vector.clone(), entry.trust))
            }
            Some(_) => {
                entries.pop(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, text: &str, vector: Vec<f32>, trust: Trust) {
        let entry = CacheEntry { vector, trust, created: Instant::now() };
        self.lock().put(Self::key(text), entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<u64, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
