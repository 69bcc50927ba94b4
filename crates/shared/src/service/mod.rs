mod comment;

pub use self::comment::CommentService;
