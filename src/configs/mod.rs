use deadpool_redis::{redis::AsyncCommands, Runtime};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use uuid::Uuid;

use crate::{api::error, ENV};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let database_url = &ENV.database_url;
    let pool = PgPoolOptions::new()
        .max_connections(ENV.database_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database migrations applied");

    Ok(pool)
}

/// Keys of every entry this service keeps in Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    User(Uuid),
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::User(id) => write!(f, "user:{id}"),
        }
    }
}

/// JSON values in Redis, addressed by [`CacheKey`].
#[derive(Clone)]
pub struct RedisCache {
    pool: deadpool_redis::Pool,
}

impl RedisCache {
    pub fn connect(redis_url: &str) -> Result<Self, error::SystemError> {
        let mut cfg = deadpool_redis::Config::from_url(redis_url);
        cfg.pool = Some(deadpool_redis::PoolConfig { max_size: 16, ..Default::default() });
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        log::info!("Redis pool created");
        Ok(Self { pool })
    }

    pub async fn fetch<T>(&self, key: CacheKey) -> Result<Option<T>, error::SystemError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut conn = self.pool.get().await?;
        let raw: Option<Vec<u8>> = conn.get(key.to_string()).await?;

        match raw {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    log::warn!("Dropping unreadable cache entry {}: {}", key, e);
                    conn.del::<_, ()>(key.to_string()).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn store<T>(
        &self,
        key: CacheKey,
        value: &T,
        ttl: Duration,
    ) -> Result<(), error::SystemError>
    where
        T: serde::Serialize,
    {
        let mut conn = self.pool.get().await?;
        let bytes = serde_json::to_vec(value)?;
        conn.set_ex::<_, _, ()>(key.to_string(), bytes, ttl.as_secs()).await?;
        Ok(())
    }

    pub async fn evict(&self, key: CacheKey) -> Result<(), error::SystemError> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(key.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keys_are_namespaced() {
        let id = Uuid::now_v7();
        assert_eq!(CacheKey::User(id).to_string(), format!("user:{id}"));
    }
}
