use async_trait::async_trait;
use sea_query::{
    DeleteStatement, Expr, InsertStatement, Order, PostgresQueryBuilder, Query, SelectStatement,
    UpdateStatement,
};
use sea_query_binder::SqlxBinder;
use tracing::{error, info};
use uuid::Uuid;

use crate::abstract_trait::CommentRepositoryTrait;
use crate::config::ConnectionPool;
use crate::model::comment::Comment;
use crate::schema::comment::Comments;
use crate::utils::AppError;

pub struct CommentRepository {
    db_pool: ConnectionPool,
}

impl CommentRepository {
    pub fn new(db_pool: ConnectionPool) -> Self {
        Self { db_pool }
    }
}

/// A non-positive `limit` leaves the page unbounded; a negative `offset` counts as zero.
fn list_by_video_id_query(video_id: &str, limit: i64, offset: i64) -> SelectStatement {
    let mut query = Query::select();

    query
        .columns([Comments::Id, Comments::VideoId, Comments::Content])
        .from(Comments::Table)
        .and_where(Expr::col(Comments::VideoId).eq(video_id))
        .order_by(Comments::CreatedAt, Order::Asc)
        .order_by(Comments::Id, Order::Asc)
        .offset(offset.max(0) as u64);

    if limit > 0 {
        query.limit(limit as u64);
    }

    query
}

fn create_query(id: Uuid, comment: &Comment) -> Result<InsertStatement, AppError> {
    let mut query = Query::insert();

    query
        .into_table(Comments::Table)
        .columns([Comments::Id, Comments::VideoId, Comments::Content])
        .values([
            id.into(),
            comment.video_id.clone().into(),
            comment.content.clone().into(),
        ])?;

    Ok(query)
}

fn update_query(comment: &Comment) -> UpdateStatement {
    Query::update()
        .table(Comments::Table)
        .values([
            (Comments::Content, comment.content.clone().into()),
            (Comments::UpdatedAt, Expr::current_timestamp().into()),
        ])
        .and_where(Expr::col(Comments::Id).eq(comment.id))
        .to_owned()
}

fn delete_query(id: Uuid) -> DeleteStatement {
    Query::delete()
        .from_table(Comments::Table)
        .and_where(Expr::col(Comments::Id).eq(id))
        .to_owned()
}

fn delete_by_video_id_query(video_id: &str) -> DeleteStatement {
    Query::delete()
        .from_table(Comments::Table)
        .and_where(Expr::col(Comments::VideoId).eq(video_id))
        .to_owned()
}

#[async_trait]
impl CommentRepositoryTrait for CommentRepository {
    async fn list_by_video_id(
        &self,
        video_id: String,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, AppError> {
        info!("Listing comments of video {video_id} (limit {limit}, offset {offset})");

        let (sql, values) =
            list_by_video_id_query(&video_id, limit, offset).build_sqlx(PostgresQueryBuilder);

        let comments = sqlx::query_as_with::<_, Comment, _>(&sql, values)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(comments)
    }

    async fn create(&self, comment: &Comment) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        let (sql, values) = create_query(id, comment)?.build_sqlx(PostgresQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        info!("New comment inserted with ID: {id}");

        Ok(id)
    }

    async fn update(&self, comment: &Comment) -> Result<(), AppError> {
        let (sql, values) = update_query(comment).build_sqlx(PostgresQueryBuilder);

        let affected = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if affected == 0 {
            error!("Comment ID {} not found for update", comment.id);
            return Err(AppError::CommentNotFound);
        }

        info!("Successfully updated comment ID {}", comment.id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let (sql, values) = delete_query(id).build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        match result.rows_affected() {
            0 => {
                error!("No comment found to delete with ID: {id}");
                Err(AppError::CommentNotFound)
            }
            _ => {
                info!("Comment ID: {id} deleted successfully");
                Ok(())
            }
        }
    }

    async fn delete_by_video_id(&self, video_id: String) -> Result<(), AppError> {
        let (sql, values) = delete_by_video_id_query(&video_id).build_sqlx(PostgresQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(&self.db_pool)
            .await?;

        info!(
            "Deleted {} comments of video {video_id}",
            result.rows_affected()
        );

        Ok(())
    }
}
