use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        relationship::{
            lifecycle::{self, Mutation, Transition, UserPair},
            repository::RelationshipRepository,
            schema::{RelationshipEntity, RelationshipStatus},
        },
        user::schema::UserEntity,
    },
};

/// `ILIKE` pattern matching `needle` literally anywhere in the value.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct RelationshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl RelationshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RelationshipRepository for RelationshipRepositoryPg {
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            SELECT *
            FROM relationships
            WHERE (user_one_id = $1 OR user_two_id = $1)
              AND ($2::relationship_status IS NULL OR status = $2)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_candidates(
        &self,
        user_id: &Uuid,
        needle: Option<&str>,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let pattern = needle.map(contains_pattern);

        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT u.*
            FROM users u
            WHERE u.deleted_at IS NULL
              AND u.id <> $1
              AND NOT EXISTS (
                  SELECT 1
                  FROM relationships r
                  WHERE r.user_one_id = LEAST($1, u.id)
                    AND r.user_two_id = GREATEST($1, u.id)
              )
              AND (
                  $2::text IS NULL
                  OR (u.first_name || ' ' || u.last_name) ILIKE $2
                  OR u.username ILIKE $2
              )
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn apply_transition(
        &self,
        transition: Transition,
        actor_id: &Uuid,
        other_id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let pair = UserPair::new(*actor_id, *other_id)?;
        let mut tx = self.pool.begin().await?;

        // Blocks a concurrent soft delete of either user until commit.
        let active: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM users WHERE id = ANY($1) AND deleted_at IS NULL FOR SHARE",
        )
        .bind(vec![pair.user_one(), pair.user_two()])
        .fetch_all(&mut *tx)
        .await?;

        if active.len() != 2 {
            tx.rollback().await?;
            return Err(error::SystemError::not_found("User not found"));
        }

        let existing = sqlx::query_as::<_, RelationshipEntity>(
            "SELECT * FROM relationships WHERE user_one_id = $1 AND user_two_id = $2 FOR UPDATE",
        )
        .bind(pair.user_one())
        .bind(pair.user_two())
        .fetch_optional(&mut *tx)
        .await?;

        let mutation = match lifecycle::plan(transition, *actor_id, pair, existing.as_ref()) {
            Ok(mutation) => mutation,
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        let result = match mutation {
            Mutation::Insert { pair, requester_id } => {
                let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
                let row = sqlx::query_as::<_, RelationshipEntity>(
                    r#"
                    INSERT INTO relationships (id, user_one_id, user_two_id, requester_id, status)
                    VALUES ($1, $2, $3, $4, 'PENDING')
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(pair.user_one())
                .bind(pair.user_two())
                .bind(requester_id)
                .fetch_one(&mut *tx)
                .await?;
                Some(row)
            }
            Mutation::Accept { id } => {
                let row = sqlx::query_as::<_, RelationshipEntity>(
                    r#"
                    UPDATE relationships
                    SET status = 'ACCEPTED', updated_at = NOW()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
                Some(row)
            }
            Mutation::Delete { id } => {
                sqlx::query("DELETE FROM relationships WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                None
            }
        };

        tx.commit().await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_patterns_match_wildcards_literally() {
        assert_eq!(contains_pattern("ann"), "%ann%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
