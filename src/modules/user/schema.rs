use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

use crate::api::error;

#[derive(Debug, PartialEq, Eq, Clone, Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum UserRole {
    #[sqlx(rename = "ROOT")]
    Root,
    #[sqlx(rename = "ADMIN")]
    Admin,
    #[sqlx(rename = "USER")]
    User,
}

impl UserRole {
    fn rank(&self) -> u8 {
        match self {
            UserRole::Root => 2,
            UserRole::Admin => 1,
            UserRole::User => 0,
        }
    }

    /// True when `self` carries at least the privileges of `other`.
    pub fn at_least(&self, other: &UserRole) -> bool {
        self.rank() >= other.rank()
    }

    pub fn promoted(&self) -> Result<UserRole, error::SystemError> {
        match self {
            UserRole::User => Ok(UserRole::Admin),
            UserRole::Admin => Err(error::SystemError::bad_request("User is already an admin")),
            UserRole::Root => Err(error::SystemError::forbidden("Root role cannot be changed")),
        }
    }

    pub fn demoted(&self) -> Result<UserRole, error::SystemError> {
        match self {
            UserRole::Admin => Ok(UserRole::User),
            UserRole::User => Err(error::SystemError::bad_request("User has no role to demote")),
            UserRole::Root => Err(error::SystemError::forbidden("Root role cannot be changed")),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub profile_pic_url: Option<String>,
    pub background_image_url: Option<String>,
    pub is_online: bool,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl UserEntity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
