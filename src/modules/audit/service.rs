use std::sync::Arc;

use crate::{
    api::error,
    modules::audit::{model::NewLogEntry, repository::AuditRepository, schema::LogEntity},
};

#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditRepository + Send + Sync>,
}

impl AuditService {
    pub fn with_dependencies(repo: Arc<dyn AuditRepository + Send + Sync>) -> Self {
        log::info!("AuditService initialized with dependencies");
        AuditService { repo }
    }

    pub async fn record(
        &self,
        method: &str,
        username: &str,
        table_name: &str,
        action: &str,
    ) -> Result<LogEntity, error::SystemError> {
        let entry = NewLogEntry {
            method: method.to_owned(),
            username: username.to_owned(),
            table_name: table_name.to_owned(),
            action: action.to_owned(),
        };
        self.repo.create(&entry).await
    }

    pub async fn all_logs(&self) -> Result<Vec<LogEntity>, error::SystemError> {
        self.repo.find_all().await
    }

    pub async fn logs_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<LogEntity>, error::SystemError> {
        self.repo.find_by_username(username).await
    }

    pub async fn clear_all(&self) -> Result<u64, error::SystemError> {
        let removed = self.repo.delete_all().await?;
        log::info!("Cleared {} audit entries", removed);
        Ok(removed)
    }

    pub async fn clear_by_username(&self, username: &str) -> Result<u64, error::SystemError> {
        let removed = self.repo.delete_by_username(username).await?;
        if removed == 0 {
            return Err(error::SystemError::not_found("No logs found for this user"));
        }
        log::info!("Cleared {} audit entries of {}", removed, username);
        Ok(removed)
    }
}
