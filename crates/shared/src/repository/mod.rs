mod cached_comment;
mod comment;

pub use self::cached_comment::CachedCommentRepository;
pub use self::comment::CommentRepository;
