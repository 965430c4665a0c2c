use uuid::Uuid;

use crate::{
    api::error,
    modules::audit::{model::NewLogEntry, repository::AuditRepository, schema::LogEntity},
};

#[derive(Clone)]
pub struct AuditRepositoryPg {
    pool: sqlx::PgPool,
}

impl AuditRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AuditRepository for AuditRepositoryPg {
    async fn create(&self, entry: &NewLogEntry) -> Result<LogEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let log = sqlx::query_as::<_, LogEntity>(
            r#"
            INSERT INTO logs (id, method, username, table_name, action)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&entry.method)
        .bind(&entry.username)
        .bind(&entry.table_name)
        .bind(&entry.action)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    async fn find_all(&self) -> Result<Vec<LogEntity>, error::SystemError> {
        let logs = sqlx::query_as::<_, LogEntity>("SELECT * FROM logs ORDER BY time DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(logs)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<LogEntity>, error::SystemError> {
        let logs = sqlx::query_as::<_, LogEntity>(
            "SELECT * FROM logs WHERE username = $1 ORDER BY time DESC",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    async fn delete_all(&self) -> Result<u64, error::SystemError> {
        let rows = sqlx::query("DELETE FROM logs").execute(&self.pool).await?.rows_affected();
        Ok(rows)
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, error::SystemError> {
        let rows = sqlx::query("DELETE FROM logs WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows)
    }
}
