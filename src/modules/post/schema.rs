use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A post written by `author_id` on the timeline of `timeline_user_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostEntity {
    pub id: Uuid,
    pub author_id: Uuid,
    pub timeline_user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TimelinePost {
    #[sqlx(flatten)]
    pub post: PostEntity,
    pub like_count: i64,
}
