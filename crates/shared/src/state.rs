use prometheus_client::registry::Registry;
use std::{sync::Arc, time::Duration};

use crate::{
    abstract_trait::DynCacheStore,
    cache::CacheStore,
    config::ConnectionPool,
    utils::{DependenciesInject, Metrics},
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub di_container: DependenciesInject,
}

impl AppState {
    pub fn new(pool: ConnectionPool, cache: Option<CacheStore>, cache_ttl: Duration) -> Self {
        let mut registry = Registry::default();

        let di_container = DependenciesInject::new(
            pool,
            cache.map(|cache_store| Arc::new(cache_store) as DynCacheStore),
            cache_ttl,
            Metrics::new(),
            &mut registry,
        );

        Self {
            registry: Arc::new(registry),
            di_container,
        }
    }
}
