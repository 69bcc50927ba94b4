use prometheus_client::registry::Registry;
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    abstract_trait::{DynCacheStore, DynCommentRepository, DynCommentService},
    config::ConnectionPool,
    repository::{CachedCommentRepository, CommentRepository},
    service::CommentService,
    utils::Metrics,
};

#[derive(Clone)]
pub struct DependenciesInject {
    pub comment_service: DynCommentService,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("comment_service", &"DynCommentService")
            .finish()
    }
}

impl DependenciesInject {
    /// Wires the comment service over PostgreSQL, behind the Redis cache when one is given.
    pub fn new(
        pool: ConnectionPool,
        cache: Option<DynCacheStore>,
        cache_ttl: Duration,
        metrics: Metrics,
        registry: &mut Registry,
    ) -> Self {
        let comment_repository = Arc::new(CommentRepository::new(pool)) as DynCommentRepository;

        let comment_repository = match cache {
            Some(cache_store) => {
                info!("Caching comment listings for {cache_ttl:?}");
                Arc::new(CachedCommentRepository::new(
                    comment_repository,
                    cache_store,
                    cache_ttl,
                )) as DynCommentRepository
            }
            None => comment_repository,
        };

        let comment_service = Arc::new(CommentService::new(comment_repository, metrics, registry))
            as DynCommentService;

        Self { comment_service }
    }
}
