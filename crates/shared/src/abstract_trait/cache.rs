use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::utils::AppError;

pub type DynCacheStore = Arc<dyn CacheStoreTrait + Send + Sync>;

/// String values and counters in a key/value cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheStoreTrait {
    /// `None` when the key is absent or expired.
    async fn get_from_cache(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set_to_cache(
        &self,
        key: &str,
        value: &str,
        expiration: Duration,
    ) -> Result<(), AppError>;

    async fn delete_from_cache(&self, key: &str) -> Result<(), AppError>;

    /// Atomically adds one to the counter under `key`, creating it at zero, and
    /// returns the new value.
    async fn increment(&self, key: &str) -> Result<i64, AppError>;
}
