use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::NewPost,
        schema::{PostEntity, TimelinePost},
    },
};

#[async_trait::async_trait]
pub trait PostRepository {
    async fn create(&self, post: &NewPost) -> Result<PostEntity, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError>;

    /// Posts on a user's timeline, newest first, with their like counts.
    async fn find_by_timeline(
        &self,
        timeline_user_id: &Uuid,
    ) -> Result<Vec<TimelinePost>, error::SystemError>;

    /// Removes the post together with its likes.
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Records the like and returns the post's new like count. Liking twice
    /// is a conflict.
    async fn add_like(&self, post_id: &Uuid, user_id: &Uuid) -> Result<i64, error::SystemError>;
}
