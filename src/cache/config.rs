use crate::error::Result;
use crate::traits::cache::Cache;
use crate::utils::get_env_with_prefix;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-memory cache (default, for dev/testing)
    InMemory,
    /// Memcached (requires memcached feature)
    #[cfg(feature = "memcached")]
    Memcached,
    /// No-op cache (for testing)
    NoOp,
}

impl Default for CacheBackend {
    fn default() -> Self {
        Self::InMemory
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackend,

    /// Memcached connection URL (only used for the memcached backend)
    ///
    /// Uses the `memcache://` scheme, e.g. `memcache://127.0.0.1:11211`.
    #[serde(default)]
    pub memcached_url: Option<String>,

    /// Default TTL for cached values (in seconds)
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Maximum number of entries for the in-memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            memcached_url: None,
            default_ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(backend) = get_env_with_prefix("CACHE_BACKEND") {
            config.backend = match backend.to_lowercase().as_str() {
                "memcached" => {
                    #[cfg(feature = "memcached")]
                    {
                        CacheBackend::Memcached
                    }
                    #[cfg(not(feature = "memcached"))]
                    {
                        tracing::warn!(
                            "Memcached requested but memcached feature not enabled, using in-memory"
                        );
                        CacheBackend::InMemory
                    }
                }
                "noop" => CacheBackend::NoOp,
                _ => CacheBackend::InMemory,
            };
        }

        if let Some(url) = get_env_with_prefix("CACHE_MEMCACHED_URL") {
            config.memcached_url = Some(url);
        }

        if let Some(ttl) = get_env_with_prefix("CACHE_DEFAULT_TTL_SECONDS") {
            if let Ok(seconds) = ttl.parse() {
                config.default_ttl_seconds = seconds;
            }
        }

        if let Some(max) = get_env_with_prefix("CACHE_MAX_ENTRIES") {
            if let Ok(entries) = max.parse() {
                config.max_entries = entries;
            }
        }

        config
    }

    /// Get default TTL as Duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// Construct the configured cache backend
    pub fn build(&self) -> Result<Arc<dyn Cache>> {
        match self.backend {
            CacheBackend::InMemory => Ok(Arc::new(super::InMemoryCache::with_ttl(
                self.max_entries,
                self.default_ttl(),
            ))),
            CacheBackend::NoOp => Ok(Arc::new(super::NoOpCache)),
            #[cfg(feature = "memcached")]
            CacheBackend::Memcached => {
                let url = self.memcached_url.as_deref().ok_or_else(|| {
                    crate::error::MooringError::internal(
                        "Memcached backend selected but no memcached_url configured. \
                        Set MOORING_CACHE_MEMCACHED_URL or config.memcached_url.",
                    )
                })?;
                Ok(Arc::new(super::MemcachedCache::new(url, self.default_ttl())?))
            }
        }
    }
}

fn default_ttl_seconds() -> u64 {
    86400 // 1 day, matching the default session lifetime
}

fn default_max_entries() -> u64 {
    10000
}
