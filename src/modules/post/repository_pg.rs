use uuid::Uuid;

use crate::{
    api::error,
    modules::post::{
        model::NewPost,
        repository::PostRepository,
        schema::{PostEntity, TimelinePost},
    },
};

#[derive(Clone)]
pub struct PostRepositoryPg {
    pool: sqlx::PgPool,
}

impl PostRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PostRepositoryPg {
    async fn create(&self, post: &NewPost) -> Result<PostEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let post = sqlx::query_as::<_, PostEntity>(
            r#"
            INSERT INTO posts (id, author_id, timeline_user_id, content, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(post.author_id)
        .bind(post.timeline_user_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        let post = sqlx::query_as::<_, PostEntity>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_by_timeline(
        &self,
        timeline_user_id: &Uuid,
    ) -> Result<Vec<TimelinePost>, error::SystemError> {
        let posts = sqlx::query_as::<_, TimelinePost>(
            r#"
            SELECT p.*, COUNT(l.user_id) AS like_count
            FROM posts p
            LEFT JOIN likes l ON l.post_id = p.id
            WHERE p.timeline_user_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(timeline_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn add_like(&self, post_id: &Uuid, user_id: &Uuid) -> Result<i64, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO likes (post_id, user_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(count)
    }
}
