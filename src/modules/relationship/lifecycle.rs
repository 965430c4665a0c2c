//! Friendship state machine.
//!
//! A pair of users is in one of three states: no row, a `PENDING` row or an
//! `ACCEPTED` row. [`plan`] looks at the current row (if any) and decides the
//! single write a transition needs, or refuses it. It never touches storage,
//! so the repository can call it while holding the row lock.
use uuid::Uuid;

use crate::{
    api::error,
    modules::relationship::schema::{RelationshipEntity, RelationshipStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Actor asks the other user to become friends.
    Request,
    /// Actor, the recipient, accepts a pending request.
    Accept,
    /// Actor, the requester, withdraws a pending request.
    Cancel,
    /// Actor, the recipient, turns a pending request down.
    Reject,
    /// Either friend ends an accepted friendship.
    Remove,
}

/// Canonically ordered pair of distinct users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPair {
    low: Uuid,
    high: Uuid,
}

impl UserPair {
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, TransitionError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(UserPair { low: a, high: b }),
            std::cmp::Ordering::Greater => Ok(UserPair { low: b, high: a }),
            std::cmp::Ordering::Equal => Err(TransitionError::SelfTarget),
        }
    }

    pub fn user_one(&self) -> Uuid {
        self.low
    }

    pub fn user_two(&self) -> Uuid {
        self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Insert { pair: UserPair, requester_id: Uuid },
    Accept { id: Uuid },
    Delete { id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Cannot create a relationship with yourself")]
    SelfTarget,
    #[error("Relationship already exists")]
    Conflict,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
}

impl From<TransitionError> for error::SystemError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::SelfTarget => error::SystemError::bad_request(err.to_string()),
            TransitionError::Conflict => error::SystemError::conflict(err.to_string()),
            TransitionError::NotFound(msg) => error::SystemError::not_found(msg),
            TransitionError::InvalidState(msg) => error::SystemError::invalid_state(msg),
            TransitionError::Unauthorized(msg) => error::SystemError::forbidden(msg),
        }
    }
}

const NO_PENDING_REQUEST: &str = "No pending friend request between these users";
const ALREADY_FRIENDS: &str = "Users are already friends";

pub fn plan(
    transition: Transition,
    actor: Uuid,
    pair: UserPair,
    existing: Option<&RelationshipEntity>,
) -> Result<Mutation, TransitionError> {
    debug_assert!(actor == pair.user_one() || actor == pair.user_two());

    match (transition, existing) {
        (Transition::Request, None) => Ok(Mutation::Insert { pair, requester_id: actor }),
        (Transition::Request, Some(_)) => Err(TransitionError::Conflict),

        (Transition::Accept | Transition::Cancel | Transition::Reject, None) => {
            Err(TransitionError::NotFound(NO_PENDING_REQUEST))
        }
        (Transition::Accept | Transition::Cancel | Transition::Reject, Some(row))
            if row.status == RelationshipStatus::Accepted =>
        {
            Err(TransitionError::InvalidState(ALREADY_FRIENDS))
        }
        (Transition::Accept, Some(row)) if row.requester_id == actor => Err(
            TransitionError::Unauthorized("Only the recipient can accept a friend request"),
        ),
        (Transition::Accept, Some(row)) => Ok(Mutation::Accept { id: row.id }),
        (Transition::Cancel, Some(row)) if row.requester_id != actor => Err(
            TransitionError::Unauthorized("Only the requester can cancel a friend request"),
        ),
        (Transition::Reject, Some(row)) if row.requester_id == actor => Err(
            TransitionError::Unauthorized("Only the recipient can reject a friend request"),
        ),
        (Transition::Cancel | Transition::Reject, Some(row)) => Ok(Mutation::Delete { id: row.id }),

        (Transition::Remove, None) => Err(TransitionError::NotFound("Users are not friends")),
        (Transition::Remove, Some(row)) if row.status == RelationshipStatus::Pending => {
            Err(TransitionError::InvalidState("Friend request has not been accepted yet"))
        }
        (Transition::Remove, Some(row)) => Ok(Mutation::Delete { id: row.id }),
    }
}
