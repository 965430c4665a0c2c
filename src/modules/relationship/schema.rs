use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(type_name = "relationship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationshipStatus {
    #[sqlx(rename = "PENDING")]
    Pending,
    #[sqlx(rename = "ACCEPTED")]
    Accepted,
}

/// One row per unordered pair: `user_one_id < user_two_id` always holds, and
/// `requester_id` is one of the two.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEntity {
    pub id: Uuid,
    pub user_one_id: Uuid,
    pub user_two_id: Uuid,
    pub requester_id: Uuid,
    pub status: RelationshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl RelationshipEntity {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.user_one_id == *user_id || self.user_two_id == *user_id
    }

    /// The slot that is not `user_id`, or `None` when `user_id` is not a party.
    pub fn other_side(&self, user_id: &Uuid) -> Option<Uuid> {
        if self.user_one_id == *user_id {
            Some(self.user_two_id)
        } else if self.user_two_id == *user_id {
            Some(self.user_one_id)
        } else {
            None
        }
    }

    pub fn recipient_id(&self) -> Uuid {
        if self.requester_id == self.user_one_id { self.user_two_id } else { self.user_one_id }
    }
}
