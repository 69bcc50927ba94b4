use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

use crate::abstract_trait::{CommentRepositoryTrait, DynCacheStore, DynCommentRepository};
use crate::model::comment::Comment;
use crate::utils::AppError;

/// Bumped by writes that only know a comment id; invalidates every cached page.
const GENERATION_KEY: &str = "comments:generation";

/// Read-through Redis cache in front of another comment repository.
///
/// Cached pages are keyed by two counters: the global generation and the
/// version of the page's video. Creating or bulk-deleting comments bumps the
/// video version, updating or deleting a single comment bumps the generation,
/// so a page cached before a write is never read after it. Cache failures are
/// logged and the call reads through.
pub struct CachedCommentRepository {
    inner: DynCommentRepository,
    cache_store: DynCacheStore,
    ttl: Duration,
}

fn video_version_key(video_id: &str) -> String {
    format!("comments:video_id={video_id}:version")
}

fn list_cache_key(
    video_id: &str,
    generation: i64,
    version: i64,
    limit: i64,
    offset: i64,
) -> String {
    format!(
        "comments:video_id={video_id}:generation={generation}:version={version}:limit={limit}:offset={offset}"
    )
}

impl CachedCommentRepository {
    pub fn new(inner: DynCommentRepository, cache_store: DynCacheStore, ttl: Duration) -> Self {
        Self {
            inner,
            cache_store,
            ttl,
        }
    }

    async fn read_counter(&self, key: &str) -> Result<i64, AppError> {
        match self.cache_store.get_from_cache(key).await? {
            Some(value) => value
                .parse()
                .map_err(|_| AppError::InternalError(format!("counter {key} holds `{value}`"))),
            None => Ok(0),
        }
    }

    /// `None` when the counters cannot be read; the page must not be cached then.
    async fn page_key(&self, video_id: &str, limit: i64, offset: i64) -> Option<String> {
        let counters = async {
            let generation = self.read_counter(GENERATION_KEY).await?;
            let version = self.read_counter(&video_version_key(video_id)).await?;
            Ok::<_, AppError>((generation, version))
        };

        match counters.await {
            Ok((generation, version)) => {
                Some(list_cache_key(video_id, generation, version, limit, offset))
            }
            Err(err) => {
                error!("Comment cache unavailable, reading through: {err}");
                None
            }
        }
    }

    async fn cached_page(&self, key: &str) -> Option<Vec<Comment>> {
        let data = match self.cache_store.get_from_cache(key).await {
            Ok(data) => data?,
            Err(err) => {
                error!("Redis get error for key {key}: {err}");
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(comments) => Some(comments),
            Err(err) => {
                error!("Failed to deserialize cached comments under {key}: {err}");
                if let Err(err) = self.cache_store.delete_from_cache(key).await {
                    error!("Failed to delete key {key}: {err}");
                }
                None
            }
        }
    }

    async fn store_page(&self, key: &str, comments: &[Comment]) {
        let data = match serde_json::to_string(comments) {
            Ok(data) => data,
            Err(err) => {
                error!("Failed to serialize comments to JSON: {err}");
                return;
            }
        };

        if let Err(err) = self.cache_store.set_to_cache(key, &data, self.ttl).await {
            error!("Failed to set cache for key {key}: {err}");
        }
    }

    async fn invalidate(&self, counter_key: &str) {
        match self.cache_store.increment(counter_key).await {
            Ok(value) => debug!("Bumped {counter_key} to {value}"),
            Err(err) => error!("Failed to invalidate cached comments via {counter_key}: {err}"),
        }
    }
}

#[async_trait]
impl CommentRepositoryTrait for CachedCommentRepository {
    async fn list_by_video_id(
        &self,
        video_id: String,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, AppError> {
        let Some(cache_key) = self.page_key(&video_id, limit, offset).await else {
            return self.inner.list_by_video_id(video_id, limit, offset).await;
        };

        if let Some(comments) = self.cached_page(&cache_key).await {
            return Ok(comments);
        }

        let comments = self.inner.list_by_video_id(video_id, limit, offset).await?;
        self.store_page(&cache_key, &comments).await;

        Ok(comments)
    }

    async fn create(&self, comment: &Comment) -> Result<Uuid, AppError> {
        let id = self.inner.create(comment).await?;
        self.invalidate(&video_version_key(&comment.video_id)).await;

        Ok(id)
    }

    async fn update(&self, comment: &Comment) -> Result<(), AppError> {
        self.inner.update(comment).await?;
        self.invalidate(GENERATION_KEY).await;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.inner.delete(id).await?;
        self.invalidate(GENERATION_KEY).await;

        Ok(())
    }

    async fn delete_by_video_id(&self, video_id: String) -> Result<(), AppError> {
        let version_key = video_version_key(&video_id);

        self.inner.delete_by_video_id(video_id).await?;
        self.invalidate(&version_key).await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstract_trait::{MockCacheStoreTrait, MockCommentRepositoryTrait};
    use assert_matches::assert_matches;
    use mockall::predicate::{always, eq};
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(60);

    fn repository(
        inner: MockCommentRepositoryTrait,
        cache: MockCacheStoreTrait,
    ) -> CachedCommentRepository {
        CachedCommentRepository::new(Arc::new(inner), Arc::new(cache), TTL)
    }

    /// Counters of video `v1` at generation 3, version 0.
    fn expect_counters(cache: &mut MockCacheStoreTrait) {
        cache
            .expect_get_from_cache()
            .with(eq(GENERATION_KEY))
            .times(1)
            .returning(|_| Ok(Some("3".to_string())));
        cache
            .expect_get_from_cache()
            .with(eq("comments:video_id=v1:version"))
            .times(1)
            .returning(|_| Ok(None));
    }

    const PAGE_KEY: &str = "comments:video_id=v1:generation=3:version=0:limit=10:offset=0";

    #[test]
    fn list_cache_key_includes_counters_and_paging() {
        assert_eq!(
            list_cache_key("v1", 2, 5, 10, 20),
            "comments:video_id=v1:generation=2:version=5:limit=10:offset=20"
        );
        assert_eq!(video_version_key("v1"), "comments:video_id=v1:version");
    }

    #[tokio::test]
    async fn list_serves_cached_page_without_touching_inner() {
        let comments = vec![Comment::fake("v1"), Comment::fake("v1")];
        let cached = serde_json::to_string(&comments).unwrap();

        let mut cache = MockCacheStoreTrait::new();
        expect_counters(&mut cache);
        cache
            .expect_get_from_cache()
            .with(eq(PAGE_KEY))
            .times(1)
            .return_once(move |_| Ok(Some(cached)));
        cache.expect_set_to_cache().times(0);

        let mut inner = MockCommentRepositoryTrait::new();
        inner.expect_list_by_video_id().times(0);

        let listed = repository(inner, cache)
            .list_by_video_id("v1".to_string(), 10, 0)
            .await
            .unwrap();

        assert_eq!(listed, comments);
    }

    #[tokio::test]
    async fn list_miss_reads_inner_and_caches_page() {
        let comments = vec![Comment::fake("v1")];
        let expected = comments.clone();
        let serialized = serde_json::to_string(&comments).unwrap();

        let mut cache = MockCacheStoreTrait::new();
        expect_counters(&mut cache);
        cache
            .expect_get_from_cache()
            .with(eq(PAGE_KEY))
            .times(1)
            .returning(|_| Ok(None));
        cache
            .expect_set_to_cache()
            .with(eq(PAGE_KEY), eq(serialized), eq(TTL))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_list_by_video_id()
            .with(eq("v1".to_string()), eq(10i64), eq(0i64))
            .times(1)
            .return_once(move |_, _, _| Ok(comments));

        let listed = repository(inner, cache)
            .list_by_video_id("v1".to_string(), 10, 0)
            .await
            .unwrap();

        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_reads_through_without_caching_when_counters_fail() {
        let comments = vec![Comment::fake("v1")];
        let expected = comments.clone();

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_get_from_cache()
            .with(eq(GENERATION_KEY))
            .times(1)
            .returning(|_| Err(AppError::InternalError("connection refused".to_string())));
        cache.expect_set_to_cache().times(0);

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_list_by_video_id()
            .times(1)
            .return_once(move |_, _, _| Ok(comments));

        let listed = repository(inner, cache)
            .list_by_video_id("v1".to_string(), 10, 0)
            .await
            .unwrap();

        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn list_drops_unreadable_page() {
        let mut cache = MockCacheStoreTrait::new();
        expect_counters(&mut cache);
        cache
            .expect_get_from_cache()
            .with(eq(PAGE_KEY))
            .times(1)
            .returning(|_| Ok(Some("not json".to_string())));
        cache
            .expect_delete_from_cache()
            .with(eq(PAGE_KEY))
            .times(1)
            .returning(|_| Ok(()));
        cache
            .expect_set_to_cache()
            .with(eq(PAGE_KEY), eq("[]".to_string()), always())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_list_by_video_id()
            .times(1)
            .return_once(|_, _, _| Ok(Vec::new()));

        let listed = repository(inner, cache)
            .list_by_video_id("v1".to_string(), 10, 0)
            .await
            .unwrap();

        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn create_bumps_video_version() {
        let comment = Comment {
            video_id: "v1".to_string(),
            content: "hi".to_string(),
            ..Default::default()
        };
        let id = Uuid::new_v4();

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_create()
            .with(eq(comment.clone()))
            .times(1)
            .return_once(move |_| Ok(id));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_increment()
            .with(eq("comments:video_id=v1:version"))
            .times(1)
            .returning(|_| Ok(1));

        let created = repository(inner, cache).create(&comment).await.unwrap();

        assert_eq!(created, id);
    }

    #[tokio::test]
    async fn update_bumps_generation() {
        let comment = Comment {
            id: Uuid::new_v4(),
            content: "edited".to_string(),
            ..Default::default()
        };

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_update()
            .with(eq(comment.clone()))
            .times(1)
            .return_once(|_| Ok(()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_increment()
            .with(eq(GENERATION_KEY))
            .times(1)
            .returning(|_| Ok(4));

        assert!(repository(inner, cache).update(&comment).await.is_ok());
    }

    #[tokio::test]
    async fn delete_bumps_generation() {
        let id = Uuid::new_v4();

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_delete()
            .with(eq(id))
            .times(1)
            .return_once(|_| Ok(()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_increment()
            .with(eq(GENERATION_KEY))
            .times(1)
            .returning(|_| Ok(4));

        assert!(repository(inner, cache).delete(id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_by_video_id_bumps_video_version() {
        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_delete_by_video_id()
            .with(eq("v1".to_string()))
            .times(1)
            .return_once(|_| Ok(()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_increment()
            .with(eq("comments:video_id=v1:version"))
            .times(1)
            .returning(|_| Ok(2));

        assert!(
            repository(inner, cache)
                .delete_by_video_id("v1".to_string())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_alone() {
        let id = Uuid::new_v4();

        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_delete()
            .with(eq(id))
            .times(1)
            .return_once(|_| Err(AppError::CommentNotFound));

        let mut cache = MockCacheStoreTrait::new();
        cache.expect_increment().times(0);

        let err = repository(inner, cache).delete(id).await.unwrap_err();

        assert_matches!(err, AppError::CommentNotFound);
    }

    #[tokio::test]
    async fn write_succeeds_when_invalidation_fails() {
        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_delete_by_video_id()
            .times(1)
            .return_once(|_| Ok(()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_increment()
            .times(1)
            .returning(|_| Err(AppError::InternalError("connection refused".to_string())));

        assert!(
            repository(inner, cache)
                .delete_by_video_id("v1".to_string())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    #[ignore = "needs a Redis server at REDIS_URL"]
    async fn deleted_comment_disappears_from_cached_listing() {
        use crate::cache::CacheStore;
        use mockall::Sequence;

        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string());
        let cache = Arc::new(CacheStore::new(redis::Client::open(url).unwrap()));

        let video_id = Uuid::new_v4().to_string();
        let comment = Comment::fake(&video_id);
        let id = comment.id;

        let mut seq = Sequence::new();
        let mut inner = MockCommentRepositoryTrait::new();
        inner
            .expect_list_by_video_id()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _, _| Ok(vec![comment]));
        inner
            .expect_delete()
            .with(eq(id))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_| Ok(()));
        inner
            .expect_list_by_video_id()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _, _| Ok(Vec::new()));

        let repository = CachedCommentRepository::new(Arc::new(inner), cache, TTL);

        let before = repository
            .list_by_video_id(video_id.clone(), 10, 0)
            .await
            .unwrap();
        assert_eq!(before.len(), 1);

        repository.delete(id).await.unwrap();

        let after = repository.list_by_video_id(video_id, 10, 0).await.unwrap();
        assert!(after.is_empty());
    }
}
