use crate::{
    abstract_trait::{CommentServiceTrait, DynCommentRepository},
    model::comment::Comment,
    utils::{AppError, Method, Metrics, Status as StatusUtils, TracingContext},
};
use async_trait::async_trait;
use genproto::comment::{
    CreateCommentRequest, CreateCommentResponse, DeleteCommentByVideoIdRequest,
    DeleteCommentByVideoIdResponse, DeleteCommentRequest, DeleteCommentResponse, HealthzResponse,
    ListCommentRequest, ListCommentResponse, UpdateCommentRequest, UpdateCommentResponse,
};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct CommentService {
    repository: DynCommentRepository,
    metrics: Metrics,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService")
            .field("repository", &"DynCommentRepository")
            .finish()
    }
}

impl CommentService {
    pub fn new(repository: DynCommentRepository, metrics: Metrics, registry: &mut Registry) -> Self {
        metrics.register("comment_service", registry);

        Self {
            repository,
            metrics,
        }
    }

    fn start_tracing(&self, operation_name: &str, attributes: Vec<KeyValue>) -> TracingContext {
        TracingContext::start("comment-service", operation_name, attributes)
    }

    fn complete_tracing_success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        let elapsed = tracing_ctx.finish(true, message);
        info!("Operation completed successfully: {message}");
        self.metrics.record(method, StatusUtils::Success, elapsed);
    }

    fn complete_tracing_error(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        let elapsed = tracing_ctx.finish(false, message);
        error!("Operation failed: {message}");
        self.metrics.record(method, StatusUtils::Error, elapsed);
    }
}

fn parse_comment_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|source| AppError::InvalidCommentId {
        id: id.to_string(),
        source,
    })
}

#[async_trait]
impl CommentServiceTrait for CommentService {
    async fn healthz(&self) -> HealthzResponse {
        let tracing_ctx =
            self.start_tracing("Healthz", vec![KeyValue::new("component", "comment")]);

        self.complete_tracing_success(&tracing_ctx, Method::Healthz, "Service is healthy");

        HealthzResponse {
            status: "ok".to_string(),
        }
    }

    async fn list_comment(
        &self,
        req: &ListCommentRequest,
    ) -> Result<ListCommentResponse, AppError> {
        let method = Method::ListComment;

        let tracing_ctx = self.start_tracing(
            "ListComment",
            vec![
                KeyValue::new("component", "comment"),
                KeyValue::new("video_id", req.video_id.clone()),
                KeyValue::new("limit", i64::from(req.limit)),
                KeyValue::new("offset", i64::from(req.offset)),
            ],
        );

        match self
            .repository
            .list_by_video_id(
                req.video_id.clone(),
                i64::from(req.limit),
                i64::from(req.offset),
            )
            .await
        {
            Ok(comments) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    &format!("Listed {} comments", comments.len()),
                );

                Ok(ListCommentResponse {
                    comments: comments.into_iter().map(Into::into).collect(),
                })
            }
            Err(err) => {
                self.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to list comments: {err}"),
                );

                Err(err)
            }
        }
    }

    async fn create_comment(
        &self,
        req: &CreateCommentRequest,
    ) -> Result<CreateCommentResponse, AppError> {
        let method = Method::CreateComment;

        let tracing_ctx = self.start_tracing(
            "CreateComment",
            vec![
                KeyValue::new("component", "comment"),
                KeyValue::new("video_id", req.video_id.clone()),
            ],
        );

        let comment = Comment {
            video_id: req.video_id.clone(),
            content: req.content.clone(),
            ..Default::default()
        };

        match self.repository.create(&comment).await {
            Ok(id) => {
                self.complete_tracing_success(&tracing_ctx, method, "Comment created successfully");

                Ok(CreateCommentResponse { id: id.to_string() })
            }
            Err(err) => {
                self.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to create comment: {err}"),
                );

                Err(err)
            }
        }
    }

    async fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> Result<UpdateCommentResponse, AppError> {
        let method = Method::UpdateComment;

        let tracing_ctx = self.start_tracing(
            "UpdateComment",
            vec![
                KeyValue::new("component", "comment"),
                KeyValue::new("comment.id", req.id.clone()),
            ],
        );

        let id = match parse_comment_id(&req.id) {
            Ok(id) => id,
            Err(err) => {
                self.complete_tracing_error(&tracing_ctx, method, &err.to_string());
                return Err(err);
            }
        };

        let comment = Comment {
            id,
            content: req.content.clone(),
            ..Default::default()
        };

        match self.repository.update(&comment).await {
            Ok(()) => {
                self.complete_tracing_success(&tracing_ctx, method, "Comment updated successfully");

                Ok(UpdateCommentResponse {})
            }
            Err(err) => {
                self.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to update comment {id}: {err}"),
                );

                Err(err)
            }
        }
    }

    async fn delete_comment(
        &self,
        req: &DeleteCommentRequest,
    ) -> Result<DeleteCommentResponse, AppError> {
        let method = Method::DeleteComment;

        let tracing_ctx = self.start_tracing(
            "DeleteComment",
            vec![
                KeyValue::new("component", "comment"),
                KeyValue::new("comment.id", req.id.clone()),
            ],
        );

        let id = match parse_comment_id(&req.id) {
            Ok(id) => id,
            Err(err) => {
                self.complete_tracing_error(&tracing_ctx, method, &err.to_string());
                return Err(err);
            }
        };

        match self.repository.delete(id).await {
            Ok(()) => {
                self.complete_tracing_success(&tracing_ctx, method, "Comment deleted successfully");

                Ok(DeleteCommentResponse {})
            }
            Err(err) => {
                self.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to delete comment {id}: {err}"),
                );

                Err(err)
            }
        }
    }

    async fn delete_comment_by_video_id(
        &self,
        req: &DeleteCommentByVideoIdRequest,
    ) -> Result<DeleteCommentByVideoIdResponse, AppError> {
        let method = Method::DeleteCommentByVideoId;

        let tracing_ctx = self.start_tracing(
            "DeleteCommentByVideoId",
            vec![
                KeyValue::new("component", "comment"),
                KeyValue::new("video_id", req.video_id.clone()),
            ],
        );

        match self
            .repository
            .delete_by_video_id(req.video_id.clone())
            .await
        {
            Ok(()) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    "Comments of video deleted successfully",
                );

                Ok(DeleteCommentByVideoIdResponse {})
            }
            Err(err) => {
                self.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to delete comments of video {}: {err}", req.video_id),
                );

                Err(err)
            }
        }
    }
}
