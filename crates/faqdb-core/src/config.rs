//! Configuration loader for the retrieval core.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars, then extracts typed sections. Every search tunable lives here
//! rather than as a hardcoded constant.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed `[search]` section; missing keys fall back to the built-in defaults.
    pub fn search(&self) -> SearchConfig {
        self.figment.extract_inner("search").unwrap_or_default()
    }

    /// Typed `[ratelimit.<provider>]` sections.
    pub fn rate_limits(&self) -> HashMap<String, RateLimitConfig> {
        self.figment.extract_inner("ratelimit").unwrap_or_default()
    }
}

/// Tunables of the search engine. Field names match the TOML keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: usize,
    pub min_similarity: f32,
    pub embedding_dimension: usize,
    pub cache_size: usize,
    pub cache_ttl_secs: u64,
    pub per_source_timeout_ms: u64,
    pub embedding_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.45,
            embedding_dimension: 768,
            cache_size: 500,
            cache_ttl_secs: 30 * 60,
            per_source_timeout_ms: 5_000,
            embedding_timeout_ms: 10_000,
        }
    }
}

impl SearchConfig {
    /// Reject values that would make the engine inert rather than slow.
    pub fn validate(&self) -> crate::Result<()> {
        if self.embedding_dimension == 0 {
            return Err(crate::Error::InvalidConfig(
                "embedding_dimension must be positive".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(crate::Error::InvalidConfig("limit must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(crate::Error::InvalidConfig(
                "min_similarity must be within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_millis(self.per_source_timeout_ms)
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }
}

/// Token-bucket parameters for one provider identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub capacity: u32,
    pub refill_per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { capacity: 60, refill_per_minute: 60 }
    }
}
