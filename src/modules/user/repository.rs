use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        schema::{UserEntity, UserRole},
    },
};

/// Lookups only ever return users that are not soft-deleted.
#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    /// Every active user, ordered by id.
    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    /// The first account ever created becomes ROOT, later ones USER.
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;

    async fn update_role(&self, id: &Uuid, role: &UserRole) -> Result<bool, error::SystemError>;

    async fn set_online(&self, id: &Uuid, online: bool) -> Result<bool, error::SystemError>;

    /// Soft-deletes the user and drops every relationship row that references them.
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
