use crate::error::Result;
use crate::traits::cache::Cache;
use async_trait::async_trait;
use std::time::Duration;

/// No-op cache implementation for testing
///
/// All operations succeed but nothing is stored, so every session opens
/// as new. Useful for tests exercising the miss path or for disabling
/// session persistence entirely.
#[derive(Clone, Default)]
pub struct NoOpCache;

#[async_trait]
impl Cache for NoOpCache {
    async fn get_bytes(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set_bytes(&self, _key: &str, _value: Vec<u8>, _ttl: Option<Duration>) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_cache_stores_nothing() {
        let cache = NoOpCache;

        cache
            .set_bytes("session:abc", b"{}".to_vec(), None)
            .await
            .unwrap();
        assert_eq!(cache.get_bytes("session:abc").await.unwrap(), None);

        cache.delete("session:abc").await.unwrap();
        cache.clear().await.unwrap();
        assert!(cache.is_healthy());
    }
}
