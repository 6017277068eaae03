//! Token-bucket rate limiter guarding the embedding backend.
//!
//! One bucket per provider identity. Refill is lazy: on every check the
//! bucket credits `floor(elapsed_minutes * refill_per_minute)` tokens,
//! capped at capacity, before consuming. An unknown provider is a logged
//! error that denies the call, never a panic.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use faqdb_core::config::RateLimitConfig;
use tracing::error;

struct RateBucket {
    tokens: u32,
    capacity: u32,
    refill_per_minute: u32,
    last_refill: Instant,
}

impl RateBucket {
    fn new(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            tokens: config.capacity,
            capacity: config.capacity,
            refill_per_minute: config.refill_per_minute,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed_minutes = now.duration_since(self.last_refill).as_secs_f64() / 60.0;
        let to_add = (elapsed_minutes * f64::from(self.refill_per_minute)).floor() as u32;
        if to_add > 0 {
            self.tokens = self.tokens.saturating_add(to_add).min(self.capacity);
            self.last_refill = now;
        }
    }

    fn time_until_refill(&self, now: Instant) -> Duration {
        if self.tokens >= self.capacity || self.refill_per_minute == 0 {
            return Duration::ZERO;
        }
        let per_token = Duration::from_secs_f64(60.0 / f64::from(self.refill_per_minute));
        per_token.saturating_sub(now.duration_since(self.last_refill))
    }
}

pub struct RateLimiter {
    buckets: Mutex<HashMap<String, RateBucket>>,
}

impl RateLimiter {
    pub fn new(configs: &HashMap<String, RateLimitConfig>) -> Self {
        let now = Instant::now();
        let buckets = configs
            .iter()
            .map(|(name, cfg)| (name.clone(), RateBucket::new(*cfg, now)))
            .collect();
        Self { buckets: Mutex::new(buckets) }
    }

    /// Refill the provider's bucket, then consume one token if available.
    /// Returns whether the call is allowed.
    pub fn check(&self, provider: &str) -> bool {
        self.check_at(provider, Instant::now())
    }

    pub fn check_at(&self, provider: &str, now: Instant) -> bool {
        let mut buckets = self.lock();
        let Some(bucket) = buckets.get_mut(provider) else {
            error!(provider, "rate limit check for unknown provider, denying");
            return false;
        };
        bucket.refill(now);
        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Read-only view of the provider's tokens; still triggers lazy refill.
    pub fn remaining_tokens(&self, provider: &str) -> u32 {
        self.remaining_tokens_at(provider, Instant::now())
    }

    pub fn remaining_tokens_at(&self, provider: &str, now: Instant) -> u32 {
        let mut buckets = self.lock();
        let Some(bucket) = buckets.get_mut(provider) else {
            error!(provider, "token count for unknown provider");
            return 0;
        };
        bucket.refill(now);
        bucket.tokens
    }

    /// Time until the next token is credited; zero when the bucket is full.
    pub fn time_until_refill(&self, provider: &str) -> Duration {
        self.time_until_refill_at(provider, Instant::now())
    }

    pub fn time_until_refill_at(&self, provider: &str, now: Instant) -> Duration {
        let mut buckets = self.lock();
        let Some(bucket) = buckets.get_mut(provider) else {
            error!(provider, "refill time for unknown provider");
            return Duration::ZERO;
        };
        bucket.refill(now);
        bucket.time_until_refill(now)
    }

    /// Restore full capacity. Administrative and test use.
    pub fn reset(&self, provider: &str) {
        let mut buckets = self.lock();
        if let Some(bucket) = buckets.get_mut(provider) {
            bucket.tokens = bucket.capacity;
            bucket.last_refill = Instant::now();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateBucket>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
