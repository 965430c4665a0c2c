use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        post::{
            model::{CreatePostBody, LikeResponse, NewPost, PostAuthorResponse, PostResponse},
            repository::PostRepository,
            repository_pg::PostRepositoryPg,
            schema::PostEntity,
        },
        user::{repository::UserRepository, repository_pg::UserRepositoryPg},
    },
};

pub type PostSvc = PostService<PostRepositoryPg, UserRepositoryPg>;

#[derive(Clone)]
pub struct PostService<P, U>
where
    P: PostRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    post_repo: Arc<P>,
    user_repo: Arc<U>,
}

impl<P, U> PostService<P, U>
where
    P: PostRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(post_repo: Arc<P>, user_repo: Arc<U>) -> Self {
        PostService { post_repo, user_repo }
    }

    pub async fn create_post(&self, body: CreatePostBody) -> Result<PostResponse, error::SystemError> {
        let (author, timeline_user) = tokio::try_join!(
            self.user_repo.find_by_id(&body.logged_in_user_id),
            self.user_repo.find_by_id(&body.timeline_user_id)
        )?;
        let author = author.ok_or_else(|| error::SystemError::not_found("User not found"))?;
        if timeline_user.is_none() {
            return Err(error::SystemError::not_found("Timeline user not found"));
        }

        let post = self
            .post_repo
            .create(&NewPost {
                author_id: author.id,
                timeline_user_id: body.timeline_user_id,
                content: body.content,
                image_url: body.image_url,
            })
            .await?;

        info!(post_id = %post.id, author_id = %post.author_id, timeline_user_id = %post.timeline_user_id, "post created");
        Ok(PostResponse::new(post, PostAuthorResponse::from(author), 0))
    }

    /// Newest first; posts whose author is gone are left out.
    pub async fn timeline(
        &self,
        timeline_user_id: Uuid,
    ) -> Result<Vec<PostResponse>, error::SystemError> {
        let posts = self.post_repo.find_by_timeline(&timeline_user_id).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.post.author_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = self.user_repo.find_by_ids(&author_ids).await?;

        Ok(posts
            .into_iter()
            .filter_map(|timeline_post| {
                let author = authors.iter().find(|a| a.id == timeline_post.post.author_id)?;
                Some(PostResponse::new(
                    timeline_post.post,
                    PostAuthorResponse::from(author.clone()),
                    timeline_post.like_count,
                ))
            })
            .collect())
    }

    pub async fn find_post(&self, post_id: Uuid) -> Result<PostEntity, error::SystemError> {
        self.post_repo
            .find_by_id(&post_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Post not found"))
    }

    pub async fn remove_post(&self, post_id: Uuid) -> Result<(), error::SystemError> {
        if !self.post_repo.delete(&post_id).await? {
            return Err(error::SystemError::not_found("Post not found"));
        }
        info!(%post_id, "post removed");
        Ok(())
    }

    pub async fn like_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<LikeResponse, error::SystemError> {
        let (user, post) =
            tokio::try_join!(self.user_repo.find_by_id(&user_id), self.post_repo.find_by_id(&post_id))?;
        if user.is_none() {
            return Err(error::SystemError::not_found("User not found"));
        }
        if post.is_none() {
            return Err(error::SystemError::not_found("Post not found"));
        }

        let like_count = self.post_repo.add_like(&post_id, &user_id).await?;
        info!(%post_id, %user_id, like_count, "post liked");
        Ok(LikeResponse { post_id, like_count })
    }
}
