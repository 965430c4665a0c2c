//! Role and ownership checks.
//!
//! Route scopes are gated with [`Access`] through the `authorization`
//! middleware; handlers call [`evaluate`] before any mutation. Nothing else
//! in the crate inspects a caller's role.
use uuid::Uuid;

use crate::{api::error, modules::user::schema::UserRole, utils::Claims};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Member,
    Admin,
    Root,
}

impl Access {
    fn minimum_role(self) -> UserRole {
        match self {
            Access::Member => UserRole::User,
            Access::Admin => UserRole::Admin,
            Access::Root => UserRole::Root,
        }
    }

    pub fn allows(self, role: &UserRole) -> bool {
        role.at_least(&self.minimum_role())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// The caller claims to be this user, e.g. `loggedInUserId` in a body.
    ActAs(&'a Uuid),
    EditProfile(&'a Uuid),
    /// Removing a post: its author or the timeline owner, otherwise root.
    RemovePost { author_id: &'a Uuid, timeline_user_id: &'a Uuid },
    ViewUsers,
    ChangeRole,
    DeleteUser,
    ViewLogs,
    ClearLogs,
}

pub fn require(claims: &Claims, access: Access) -> Result<(), error::Error> {
    if access.allows(&claims.role) {
        Ok(())
    } else {
        Err(error::Error::forbidden("No permission"))
    }
}

pub fn evaluate(claims: &Claims, action: Action<'_>) -> Result<(), error::Error> {
    match action {
        Action::ActAs(user_id) if claims.sub == *user_id => Ok(()),
        Action::ActAs(_) => Err(error::Error::forbidden("Cannot act on behalf of another user")),
        Action::EditProfile(user_id) if claims.sub == *user_id => Ok(()),
        Action::EditProfile(_) => require(claims, Access::Admin),
        Action::RemovePost { author_id, timeline_user_id }
            if claims.sub == *author_id || claims.sub == *timeline_user_id =>
        {
            Ok(())
        }
        Action::RemovePost { .. } => require(claims, Access::Root),
        Action::ViewUsers | Action::ChangeRole | Action::ViewLogs => {
            require(claims, Access::Admin)
        }
        Action::DeleteUser | Action::ClearLogs => require(claims, Access::Root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole) -> Claims {
        Claims::new(&Uuid::now_v7(), "someone", &role, 60)
    }

    #[test]
    fn member_access_admits_every_role() {
        for role in [UserRole::User, UserRole::Admin, UserRole::Root] {
            assert!(Access::Member.allows(&role));
        }
        assert!(!Access::Admin.allows(&UserRole::User));
        assert!(!Access::Root.allows(&UserRole::Admin));
    }

    #[test]
    fn acting_as_another_user_is_refused_even_for_root() {
        let root = claims(UserRole::Root);
        assert!(evaluate(&root, Action::ActAs(&root.sub)).is_ok());

        let other = Uuid::now_v7();
        let err = evaluate(&root, Action::ActAs(&other)).unwrap_err();
        assert!(matches!(err, error::Error::Forbidden(_)));
    }

    #[test]
    fn profile_edits_allow_self_or_admin() {
        let user = claims(UserRole::User);
        let other = Uuid::now_v7();
        assert!(evaluate(&user, Action::EditProfile(&user.sub)).is_ok());
        assert!(evaluate(&user, Action::EditProfile(&other)).is_err());
        assert!(evaluate(&claims(UserRole::Admin), Action::EditProfile(&other)).is_ok());
    }

    #[test]
    fn posts_are_removed_by_author_timeline_owner_or_root() {
        let author = claims(UserRole::User);
        let owner = claims(UserRole::User);
        let action =
            Action::RemovePost { author_id: &author.sub, timeline_user_id: &owner.sub };

        assert!(evaluate(&author, action).is_ok());
        assert!(evaluate(&owner, action).is_ok());
        assert!(evaluate(&claims(UserRole::User), action).is_err());
        assert!(evaluate(&claims(UserRole::Admin), action).is_err());
        assert!(evaluate(&claims(UserRole::Root), action).is_ok());
    }

    #[test]
    fn destructive_actions_need_root() {
        let admin = claims(UserRole::Admin);
        assert!(evaluate(&admin, Action::ViewLogs).is_ok());
        assert!(evaluate(&admin, Action::ChangeRole).is_ok());
        assert!(evaluate(&admin, Action::ClearLogs).is_err());
        assert!(evaluate(&admin, Action::DeleteUser).is_err());

        let root = claims(UserRole::Root);
        assert!(evaluate(&root, Action::ClearLogs).is_ok());
        assert!(evaluate(&root, Action::DeleteUser).is_ok());
        assert!(evaluate(&claims(UserRole::User), Action::ViewUsers).is_err());
    }
}
