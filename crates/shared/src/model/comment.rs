use genproto::comment::CommentInfo;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A comment attached to a video.
///
/// `id` stays nil until the repository assigns one on create.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: Uuid,
    pub video_id: String,
    pub content: String,
}

impl From<Comment> for CommentInfo {
    fn from(comment: Comment) -> Self {
        CommentInfo {
            id: comment.id.to_string(),
            video_id: comment.video_id,
            content: comment.content,
        }
    }
}

#[cfg(test)]
impl Comment {
    /// Builds a comment with a random id, for a random video when `video_id` is empty.
    pub fn fake(video_id: &str) -> Self {
        let video_id = if video_id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            video_id.to_string()
        };

        Self {
            id: Uuid::new_v4(),
            video_id,
            content: format!("comment {}", Uuid::new_v4()),
        }
    }
}
