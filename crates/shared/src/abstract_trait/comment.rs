use async_trait::async_trait;
use genproto::comment::{
    CreateCommentRequest, CreateCommentResponse, DeleteCommentByVideoIdRequest,
    DeleteCommentByVideoIdResponse, DeleteCommentRequest, DeleteCommentResponse, HealthzResponse,
    ListCommentRequest, ListCommentResponse, UpdateCommentRequest, UpdateCommentResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::model::comment::Comment;
use crate::utils::AppError;

pub type DynCommentRepository = Arc<dyn CommentRepositoryTrait + Send + Sync>;
pub type DynCommentService = Arc<dyn CommentServiceTrait + Send + Sync>;

/// Storage access for comments.
///
/// `update` and `delete` report a missing row as [`AppError::CommentNotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepositoryTrait {
    /// Comments of one video in storage order.
    async fn list_by_video_id(
        &self,
        video_id: String,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, AppError>;

    /// Persists `comment` under a freshly assigned id and returns that id.
    async fn create(&self, comment: &Comment) -> Result<Uuid, AppError>;

    /// Replaces the content of the comment identified by `comment.id`.
    async fn update(&self, comment: &Comment) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    async fn delete_by_video_id(&self, video_id: String) -> Result<(), AppError>;
}

#[async_trait]
pub trait CommentServiceTrait {
    async fn healthz(&self) -> HealthzResponse;
    async fn list_comment(
        &self,
        req: &ListCommentRequest,
    ) -> Result<ListCommentResponse, AppError>;
    async fn create_comment(
        &self,
        req: &CreateCommentRequest,
    ) -> Result<CreateCommentResponse, AppError>;
    async fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> Result<UpdateCommentResponse, AppError>;
    async fn delete_comment(
        &self,
        req: &DeleteCommentRequest,
    ) -> Result<DeleteCommentResponse, AppError>;
    async fn delete_comment_by_video_id(
        &self,
        req: &DeleteCommentByVideoIdRequest,
    ) -> Result<DeleteCommentByVideoIdResponse, AppError>;
}
