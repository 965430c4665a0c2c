use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        relationship::{
            lifecycle::Transition,
            schema::{RelationshipEntity, RelationshipStatus},
        },
        user::schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait RelationshipRepository {
    /// Rows where `user_id` occupies either slot, most recently updated first.
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError>;

    /// Active users other than `user_id` with no row against them, ordered by
    /// id. `needle` narrows them to a case-insensitive substring of
    /// "first last" or the username.
    async fn find_candidates(
        &self,
        user_id: &Uuid,
        needle: Option<&str>,
    ) -> Result<Vec<UserEntity>, error::SystemError>;

    /// Loads the pair's row under lock, plans `transition` against it and
    /// applies the resulting write in one transaction. Both users must still
    /// be active inside that transaction. Returns the row as it stands
    /// afterwards, `None` once it has been deleted.
    async fn apply_transition(
        &self,
        transition: Transition,
        actor_id: &Uuid,
        other_id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError>;
}
