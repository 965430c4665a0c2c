use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::{
    relationship::schema::{RelationshipEntity, RelationshipStatus},
    user::schema::UserEntity,
};

fn distinct_users(a: &Uuid, b: &Uuid) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::new("distinct_users")
            .with_message("A user cannot target themselves".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_add_friend"))]
pub struct AddFriendBody {
    pub logged_in_user_id: Uuid,
    pub friend_candidate_id: Uuid,
}

fn validate_add_friend(body: &AddFriendBody) -> Result<(), ValidationError> {
    distinct_users(&body.logged_in_user_id, &body.friend_candidate_id)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_remove_friend"))]
pub struct RemoveFriendBody {
    pub logged_in_user_id: Uuid,
    pub friend_to_remove_id: Uuid,
}

fn validate_remove_friend(body: &RemoveFriendBody) -> Result<(), ValidationError> {
    distinct_users(&body.logged_in_user_id, &body.friend_to_remove_id)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_accept_friend"))]
pub struct AcceptFriendBody {
    pub logged_in_user_id: Uuid,
    pub friend_to_accept_id: Uuid,
}

fn validate_accept_friend(body: &AcceptFriendBody) -> Result<(), ValidationError> {
    distinct_users(&body.logged_in_user_id, &body.friend_to_accept_id)
}

/// Shared by cancel (caller is the requester) and reject (caller is the recipient).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_pending_request"))]
pub struct PendingRequestBody {
    pub logged_in_user_id: Uuid,
    pub friend_to_reject_id: Uuid,
}

fn validate_pending_request(body: &PendingRequestBody) -> Result<(), ValidationError> {
    distinct_users(&body.logged_in_user_id, &body.friend_to_reject_id)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub logged_in_user_id: Uuid,
    #[serde(default)]
    #[validate(length(max = 100, message = "Search must be at most 100 characters long"))]
    pub search: String,
}

/// Which slice of a user's relationships to project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipView {
    Friends,
    Incoming,
    Outgoing,
}

impl RelationshipView {
    pub fn status(self) -> RelationshipStatus {
        match self {
            RelationshipView::Friends => RelationshipStatus::Accepted,
            RelationshipView::Incoming | RelationshipView::Outgoing => RelationshipStatus::Pending,
        }
    }

    pub fn includes(self, row: &RelationshipEntity, user_id: &Uuid) -> bool {
        if !row.involves(user_id) || row.status != self.status() {
            return false;
        }
        match self {
            RelationshipView::Friends => true,
            RelationshipView::Incoming => row.requester_id != *user_id,
            RelationshipView::Outgoing => row.requester_id == *user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_pic_url: Option<String>,
    pub is_online: bool,
}

impl From<UserEntity> for ConnectionResponse {
    fn from(user: UserEntity) -> Self {
        ConnectionResponse {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_pic_url: user.profile_pic_url,
            is_online: user.is_online,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: RelationshipStatus,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<RelationshipEntity> for RelationshipResponse {
    fn from(row: RelationshipEntity) -> Self {
        RelationshipResponse {
            id: row.id,
            requester_id: row.requester_id,
            recipient_id: row.recipient_id(),
            status: row.status,
            updated_at: row.updated_at,
        }
    }
}
