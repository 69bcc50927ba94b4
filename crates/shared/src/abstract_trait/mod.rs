mod cache;
mod comment;

pub use self::cache::{CacheStoreTrait, DynCacheStore};
pub use self::comment::{
    CommentRepositoryTrait, CommentServiceTrait, DynCommentRepository, DynCommentService,
};

#[cfg(test)]
pub use self::cache::MockCacheStoreTrait;
#[cfg(test)]
pub use self::comment::MockCommentRepositoryTrait;
