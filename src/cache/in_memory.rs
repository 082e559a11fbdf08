//! In-memory cache implementation backed by moka
//!
//! Suitable for development, testing, and single-instance deployments.
//! Sessions stored here are lost on restart and not shared across
//! instances; use the memcached backend for production.

use crate::error::Result;
use crate::traits::cache::Cache;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

/// Default TTL for cache entries when none is specified (1 day)
const DEFAULT_TTL: Duration = Duration::from_secs(86400);

/// Cache entry that stores value with optional custom TTL
#[derive(Clone)]
struct CacheEntry {
    value: Vec<u8>,
    /// Custom TTL for this entry, None means use default
    custom_ttl: Option<Duration>,
}

/// Expiry implementation that supports per-entry TTL
struct CacheExpiry {
    default_ttl: Duration,
}

impl Expiry<String, CacheEntry> for CacheExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.custom_ttl.unwrap_or(self.default_ttl))
    }

    fn expire_after_read(
        &self,
        _key: &String,
        _value: &CacheEntry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        // Don't change expiry on read (TTL behavior, not TTI)
        duration_until_expiry
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        // Reset TTL on update, matching memcached SET semantics
        Some(value.custom_ttl.unwrap_or(self.default_ttl))
    }
}

/// In-memory cache backed by moka
///
/// Bounded by entry count, with per-entry TTL expiration and TinyLFU
/// eviction. Each save of a session resets that entry's TTL, the same
/// sliding behavior a memcached SET gives.
#[derive(Clone)]
pub struct InMemoryCache {
    inner: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    /// Create a new in-memory cache with the specified maximum number of entries
    pub fn new(max_entries: u64) -> Self {
        Self::with_ttl(max_entries, DEFAULT_TTL)
    }

    /// Create a cache with custom default TTL
    pub fn with_ttl(max_entries: u64, default_ttl: Duration) -> Self {
        let expiry = CacheExpiry { default_ttl };
        let cache = MokaCache::builder()
            .max_capacity(max_entries)
            .expire_after(expiry)
            .build();

        Self { inner: cache }
    }

    /// Run pending maintenance tasks (eviction, expiration)
    ///
    /// Moka runs maintenance automatically; this forces immediate cleanup,
    /// which tests use to make expiration observable.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Get the current number of entries in the cache
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.get(key).await.map(|entry| entry.value))
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry {
            value,
            custom_ttl: ttl,
        };
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.invalidate_all();
        // Run pending tasks to ensure invalidation completes
        self.inner.run_pending_tasks().await;
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true // In-memory cache is always healthy
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::cache::CacheExt;

    #[tokio::test]
    async fn test_get_set_bytes() {
        let cache = InMemoryCache::new(100);
        cache
            .set_bytes("session:abc", b"{\"user\":\"alice\"}".to_vec(), None)
            .await
            .unwrap();

        let value = cache.get_bytes("session:abc").await.unwrap();
        assert_eq!(value, Some(b"{\"user\":\"alice\"}".to_vec()));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let cache = InMemoryCache::new(100);
        assert_eq!(cache.get_bytes("session:missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = InMemoryCache::with_ttl(100, Duration::from_millis(50));
        cache
            .set_bytes(
                "session:abc",
                b"{}".to_vec(),
                Some(Duration::from_millis(10)),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.run_pending_tasks().await;

        assert_eq!(cache.get_bytes("session:abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new(100);
        cache
            .set_bytes("session:abc", b"{}".to_vec(), None)
            .await
            .unwrap();
        cache.delete("session:abc").await.unwrap();

        assert_eq!(cache.get_bytes("session:abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let cache = InMemoryCache::new(100);
        cache.delete("session:never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new(100);
        cache
            .set_bytes("session:a", b"1".to_vec(), None)
            .await
            .unwrap();
        cache
            .set_bytes("session:b", b"2".to_vec(), None)
            .await
            .unwrap();
        cache.clear().await.unwrap();

        assert_eq!(cache.get_bytes("session:a").await.unwrap(), None);
        assert_eq!(cache.get_bytes("session:b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_typed_roundtrip_via_ext() {
        let cache = InMemoryCache::new(100);
        cache.set("user:123", &"alice", None).await.unwrap();

        let value: Option<String> = cache.get("user:123").await.unwrap();
        assert_eq!(value, Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_bounded_cache_does_not_grow_unbounded() {
        let cache = InMemoryCache::new(10);

        for i in 0..100 {
            cache
                .set_bytes(&format!("session:{}", i), vec![i as u8], None)
                .await
                .unwrap();
        }

        cache.run_pending_tasks().await;

        // Moka may slightly exceed max_capacity during concurrent writes
        let size = cache.entry_count();
        assert!(
            size <= 15,
            "Cache should be bounded near max_entries, got {}",
            size
        );
    }
}
