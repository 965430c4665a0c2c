use crate::{
    api::error,
    modules::audit::{model::NewLogEntry, schema::LogEntity},
};

#[async_trait::async_trait]
pub trait AuditRepository {
    async fn create(&self, entry: &NewLogEntry) -> Result<LogEntity, error::SystemError>;

    /// Newest first.
    async fn find_all(&self) -> Result<Vec<LogEntity>, error::SystemError>;

    /// Newest first.
    async fn find_by_username(&self, username: &str)
    -> Result<Vec<LogEntity>, error::SystemError>;

    async fn delete_all(&self) -> Result<u64, error::SystemError>;

    async fn delete_by_username(&self, username: &str) -> Result<u64, error::SystemError>;
}
