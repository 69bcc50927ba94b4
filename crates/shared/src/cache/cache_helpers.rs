use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::debug;

use crate::abstract_trait::CacheStoreTrait;
use crate::utils::AppError;

#[derive(Clone)]
pub struct CacheStore {
    pub redis: Arc<redis::Client>,
}

impl CacheStore {
    pub fn new(redis: redis::Client) -> Self {
        Self {
            redis: Arc::new(redis),
        }
    }
}

#[async_trait]
impl CacheStoreTrait for CacheStore {
    async fn get_from_cache(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let value: Option<String> = conn.get(key).await?;
        if value.is_none() {
            debug!("Cache miss for key {}", key);
        }

        Ok(value)
    }

    async fn set_to_cache(
        &self,
        key: &str,
        value: &str,
        expiration: Duration,
    ) -> Result<(), AppError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn.set_ex(key, value, expiration.as_secs()).await?;
        debug!("Cached data under key {} with TTL {:?}", key, expiration);

        Ok(())
    }

    async fn delete_from_cache(&self, key: &str) -> Result<(), AppError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        conn.del::<_, ()>(key).await?;

        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, AppError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let value: i64 = conn.incr(key, 1).await?;

        Ok(value)
    }
}
