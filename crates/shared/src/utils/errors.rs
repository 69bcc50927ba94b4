use thiserror::Error;
use tonic::Status;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("comment not found")]
    CommentNotFound,

    #[error("invalid comment id `{id}`: {source}")]
    InvalidCommentId {
        id: String,
        #[source]
        source: uuid::Error,
    },

    #[error("database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("query build error: {0}")]
    QueryBuildError(#[from] sea_query::error::Error),

    #[error("redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        match err {
            AppError::CommentNotFound => Status::not_found(err.to_string()),
            AppError::InvalidCommentId { .. } => Status::invalid_argument(err.to_string()),
            _ => Status::internal(err.to_string()),
        }
    }
}
