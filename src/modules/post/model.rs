use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{post::schema::PostEntity, user::schema::UserEntity};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub logged_in_user_id: Uuid,
    pub timeline_user_id: Uuid,
    #[validate(length(min = 1, max = 5000, message = "Content must be 1 to 5000 characters long"))]
    pub content: String,
    #[validate(url(message = "Invalid image url"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RemovePostBody {
    pub logged_in_user_id: Uuid,
    pub post_to_remove_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LikePostBody {
    pub logged_in_user_id: Uuid,
    pub post_id: Uuid,
}

pub struct NewPost {
    pub author_id: Uuid,
    pub timeline_user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthorResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_pic_url: Option<String>,
}

impl From<UserEntity> for PostAuthorResponse {
    fn from(user: UserEntity) -> Self {
        PostAuthorResponse {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_pic_url: user.profile_pic_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub author: PostAuthorResponse,
    pub timeline_user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub like_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PostResponse {
    pub fn new(post: PostEntity, author: PostAuthorResponse, like_count: i64) -> Self {
        PostResponse {
            id: post.id,
            author,
            timeline_user_id: post.timeline_user_id,
            content: post.content,
            image_url: post.image_url,
            like_count,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub post_id: Uuid,
    pub like_count: i64,
}
