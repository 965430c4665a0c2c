use uuid::Uuid;

use crate::{
    api::error,
    configs::{CacheKey, RedisCache},
    constants::USER_CACHE_TTL,
    modules::user::model::UserResponse,
};

/// Read-through store for user profiles.
#[async_trait::async_trait]
pub trait UserCache {
    async fn get(&self, id: &Uuid) -> Result<Option<UserResponse>, error::SystemError>;

    async fn put(&self, user: &UserResponse) -> Result<(), error::SystemError>;

    async fn invalidate(&self, id: &Uuid) -> Result<(), error::SystemError>;
}

#[async_trait::async_trait]
impl UserCache for RedisCache {
    async fn get(&self, id: &Uuid) -> Result<Option<UserResponse>, error::SystemError> {
        self.fetch(CacheKey::User(*id)).await
    }

    async fn put(&self, user: &UserResponse) -> Result<(), error::SystemError> {
        self.store(CacheKey::User(user.id), user, USER_CACHE_TTL).await
    }

    async fn invalidate(&self, id: &Uuid) -> Result<(), error::SystemError> {
        self.evict(CacheKey::User(*id)).await
    }
}
