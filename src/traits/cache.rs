//! Cache trait for key-value session storage
//!
//! This trait abstracts the storage backend behind the session store,
//! allowing users to swap between memcached, in-memory, or custom
//! implementations. Sessions only need the byte-level operations; the
//! typed helpers on [`CacheExt`] exist for application data that shares
//! the cache.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value cache with per-entry TTL
///
/// The trait is object-safe: values travel as raw bytes so a
/// `Arc<dyn Cache>` handle can be shared across the application. Absence
/// is not an error: `get_bytes` on a missing or expired key returns
/// `Ok(None)`, and `delete` on a missing key succeeds.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get the raw bytes stored under `key`
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store raw bytes under `key` with an optional TTL
    ///
    /// With `ttl = None` the backend's default TTL applies. TTLs are
    /// truncated to whole seconds by backends that only support second
    /// granularity.
    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Delete the entry under `key`, succeeding even if it was absent
    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry from the cache
    async fn clear(&self) -> Result<()>;

    /// Check if the cache backend is reachable
    fn is_healthy(&self) -> bool;
}

/// Typed helpers layered over [`Cache`]
///
/// Serializes values to JSON on the way in and back out, using the
/// object-safe byte operations underneath.
pub trait CacheExt: Cache {
    /// Get and deserialize a value from the cache
    async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                crate::error::MooringError::serialization(format!(
                    "Failed to deserialize cached value: {}",
                    e
                ))
            }),
            None => Ok(None),
        }
    }

    /// Serialize and store a value in the cache
    async fn set<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: serde::Serialize + Send + Sync,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| {
            crate::error::MooringError::serialization(format!("Failed to serialize value: {}", e))
        })?;
        self.set_bytes(key, bytes, ttl).await
    }
}

// Blanket implementation - all Cache implementations get CacheExt for free
impl<T: Cache> CacheExt for T {}
