use genproto::comment::{
    CreateCommentRequest, CreateCommentResponse, DeleteCommentByVideoIdRequest,
    DeleteCommentByVideoIdResponse, DeleteCommentRequest, DeleteCommentResponse, HealthzRequest,
    HealthzResponse, ListCommentRequest, ListCommentResponse, UpdateCommentRequest,
    UpdateCommentResponse, comment_service_server::CommentService,
};
use shared::abstract_trait::DynCommentService;
use tonic::{Request, Response, Status};
use tracing::{error, info};

pub struct CommentServiceImpl {
    service: DynCommentService,
}

impl CommentServiceImpl {
    pub fn new(service: DynCommentService) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl CommentService for CommentServiceImpl {
    async fn healthz(
        &self,
        _request: Request<HealthzRequest>,
    ) -> Result<Response<HealthzResponse>, Status> {
        Ok(Response::new(self.service.healthz().await))
    }

    async fn list_comment(
        &self,
        request: Request<ListCommentRequest>,
    ) -> Result<Response<ListCommentResponse>, Status> {
        let req = request.into_inner();
        info!("Listing comments of video {}", req.video_id);

        match self.service.list_comment(&req).await {
            Ok(resp) => Ok(Response::new(resp)),
            Err(err) => {
                error!("Failed to list comments: {err}");
                Err(err.into())
            }
        }
    }

    async fn create_comment(
        &self,
        request: Request<CreateCommentRequest>,
    ) -> Result<Response<CreateCommentResponse>, Status> {
        let req = request.into_inner();
        info!("Creating comment on video {}", req.video_id);

        match self.service.create_comment(&req).await {
            Ok(resp) => Ok(Response::new(resp)),
            Err(err) => {
                error!("Failed to create comment: {err}");
                Err(err.into())
            }
        }
    }

    async fn update_comment(
        &self,
        request: Request<UpdateCommentRequest>,
    ) -> Result<Response<UpdateCommentResponse>, Status> {
        let req = request.into_inner();
        info!("Updating comment {}", req.id);

        match self.service.update_comment(&req).await {
            Ok(resp) => Ok(Response::new(resp)),
            Err(err) => {
                error!("Failed to update comment {}: {err}", req.id);
                Err(err.into())
            }
        }
    }

    async fn delete_comment(
        &self,
        request: Request<DeleteCommentRequest>,
    ) -> Result<Response<DeleteCommentResponse>, Status> {
        let req = request.into_inner();
        info!("Deleting comment {}", req.id);

        match self.service.delete_comment(&req).await {
            Ok(resp) => Ok(Response::new(resp)),
            Err(err) => {
                error!("Failed to delete comment {}: {err}", req.id);
                Err(err.into())
            }
        }
    }

    async fn delete_comment_by_video_id(
        &self,
        request: Request<DeleteCommentByVideoIdRequest>,
    ) -> Result<Response<DeleteCommentByVideoIdResponse>, Status> {
        let req = request.into_inner();
        info!("Deleting comments of video {}", req.video_id);

        match self.service.delete_comment_by_video_id(&req).await {
            Ok(resp) => Ok(Response::new(resp)),
            Err(err) => {
                error!("Failed to delete comments of video {}: {err}", req.video_id);
                Err(err.into())
            }
        }
    }
}
