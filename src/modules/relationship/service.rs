use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        relationship::{
            lifecycle::{Transition, TransitionError},
            model::{ConnectionResponse, RelationshipResponse, RelationshipView},
            repository::RelationshipRepository,
            repository_pg::RelationshipRepositoryPg,
            schema::RelationshipEntity,
        },
        user::{repository::UserRepository, repository_pg::UserRepositoryPg},
    },
};

pub type RelationshipSvc = RelationshipService<RelationshipRepositoryPg, UserRepositoryPg>;

#[derive(Clone)]
pub struct RelationshipService<R, U>
where
    R: RelationshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    relationship_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> RelationshipService<R, U>
where
    R: RelationshipRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(relationship_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        RelationshipService { relationship_repo, user_repo }
    }

    pub async fn create_request(
        &self,
        requester_id: Uuid,
        target_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let row = self.transition(Transition::Request, requester_id, target_id).await?;
        let row = row.ok_or_else(|| {
            error::SystemError::InternalError("friend request was not persisted".into())
        })?;
        info!(relationship_id = %row.id, %requester_id, %target_id, "friend request created");
        Ok(RelationshipResponse::from(row))
    }

    pub async fn accept_friend(
        &self,
        recipient_id: Uuid,
        requester_id: Uuid,
    ) -> Result<RelationshipResponse, error::SystemError> {
        let row = self.transition(Transition::Accept, recipient_id, requester_id).await?;
        let row = row.ok_or_else(|| {
            error::SystemError::InternalError("accepted friendship was not returned".into())
        })?;
        info!(relationship_id = %row.id, %recipient_id, %requester_id, "friend request accepted");
        Ok(RelationshipResponse::from(row))
    }

    pub async fn cancel_request(
        &self,
        requester_id: Uuid,
        target_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.transition(Transition::Cancel, requester_id, target_id).await?;
        info!(%requester_id, %target_id, "friend request cancelled");
        Ok(())
    }

    pub async fn reject_request(
        &self,
        recipient_id: Uuid,
        requester_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.transition(Transition::Reject, recipient_id, requester_id).await?;
        info!(%recipient_id, %requester_id, "friend request rejected");
        Ok(())
    }

    pub async fn remove_friend(
        &self,
        user_id: Uuid,
        friend_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.transition(Transition::Remove, user_id, friend_id).await?;
        info!(%user_id, %friend_id, "friendship removed");
        Ok(())
    }

    async fn transition(
        &self,
        transition: Transition,
        actor_id: Uuid,
        other_id: Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        if actor_id == other_id {
            return Err(TransitionError::SelfTarget.into());
        }

        let (actor, other) = tokio::try_join!(
            self.user_repo.find_by_id(&actor_id),
            self.user_repo.find_by_id(&other_id)
        )?;
        if actor.is_none() || other.is_none() {
            return Err(error::SystemError::not_found("User not found"));
        }

        self.relationship_repo.apply_transition(transition, &actor_id, &other_id).await
    }

    pub async fn find_all_user_relationships_with_status(
        &self,
        user_id: Uuid,
        view: RelationshipView,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let rows = self.relationship_repo.find_by_user(&user_id, Some(view.status())).await?;
        Ok(rows.into_iter().filter(|row| view.includes(row, &user_id)).collect())
    }

    pub async fn find_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        self.project(user_id, RelationshipView::Friends).await
    }

    pub async fn find_incoming_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        self.project(user_id, RelationshipView::Incoming).await
    }

    pub async fn find_outgoing_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        self.project(user_id, RelationshipView::Outgoing).await
    }

    /// Resolves the other side of each row to a user, keeping row order.
    async fn project(
        &self,
        user_id: Uuid,
        view: RelationshipView,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        let rows = self.find_all_user_relationships_with_status(user_id, view).await?;
        let other_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.other_side(&user_id)).collect();
        if other_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut users = self.user_repo.find_by_ids(&other_ids).await?;
        let connections = other_ids
            .iter()
            .filter_map(|id| {
                let idx = users.iter().position(|u| u.id == *id)?;
                Some(ConnectionResponse::from(users.swap_remove(idx)))
            })
            .collect();

        Ok(connections)
    }

    pub async fn find_all_friend_candidates(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        let candidates = self.relationship_repo.find_candidates(&user_id, None).await?;
        Ok(candidates.into_iter().map(ConnectionResponse::from).collect())
    }

    /// A blank query returns every candidate.
    pub async fn search_users(
        &self,
        user_id: Uuid,
        query: &str,
    ) -> Result<Vec<ConnectionResponse>, error::SystemError> {
        let needle = query.trim();
        let needle = if needle.is_empty() { None } else { Some(needle) };

        let candidates = self.relationship_repo.find_candidates(&user_id, needle).await?;
        Ok(candidates.into_iter().map(ConnectionResponse::from).collect())
    }
}
