use crate::error::{MooringError, Result};
use crate::traits::cache::Cache;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Memcached cache implementation
///
/// Wraps the blocking `memcache` client; every operation runs on tokio's
/// blocking thread pool. Connection pooling, timeouts, and retries are the
/// client's concern, not this adapter's.
#[derive(Clone)]
pub struct MemcachedCache {
    client: Arc<memcache::Client>,
    default_ttl: Duration,
}

impl MemcachedCache {
    /// Create a new memcached cache from a connection URL
    ///
    /// URLs use the `memcache://` scheme, e.g. `memcache://127.0.0.1:11211`.
    pub fn new(url: &str, default_ttl: Duration) -> Result<Self> {
        let client = memcache::connect(url).map_err(|e| {
            MooringError::internal(format!("Failed to create memcached client: {}", e))
        })?;

        Ok(Self {
            client: Arc::new(client),
            default_ttl,
        })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&memcache::Client) -> std::result::Result<T, memcache::MemcacheError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || op(&client))
            .await
            .map_err(|e| MooringError::internal(format!("Memcached task panicked: {}", e)))?
            .map_err(|e| MooringError::cache_unavailable(format!("Memcached operation failed: {}", e)))
    }
}

#[async_trait]
impl Cache for MemcachedCache {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = key.to_string();
        self.run_blocking(move |client| client.get::<Vec<u8>>(&key))
            .await
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let key = key.to_string();
        // Memcached expirations are whole seconds
        let expiration = ttl.unwrap_or(self.default_ttl).as_secs() as u32;
        self.run_blocking(move |client| client.set(&key, value.as_slice(), expiration))
            .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        // The returned bool reports whether the key existed; a miss on
        // delete is not an error here
        self.run_blocking(move |client| client.delete(&key)).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.run_blocking(|client| client.flush()).await
    }

    fn is_healthy(&self) -> bool {
        // Best-effort blocking probe
        self.client.version().is_ok()
    }
}
