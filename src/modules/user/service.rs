use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;

use crate::modules::user::model::{
    InsertUser, LoginModel, LoginResponse, RegisterModel, RegisterResponse, UpdateUserModel,
    UserResponse,
};
use crate::modules::user::{cache::UserCache, repository::UserRepository, schema::UserRole};
use crate::utils::{hash_password, verify_password, TokenIssuer};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<dyn UserCache + Send + Sync>,
    tokens: TokenIssuer,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<dyn UserCache + Send + Sync>,
        tokens: TokenIssuer,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache, tokens }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        if let Some(cached_user) = self.cache.get(&id).await? {
            info!("User {} found in cache", id);
            return Ok(cached_user);
        }
        let user_entity = self.repo.find_by_id(&id).await?;
        if let Some(entity) = user_entity {
            let response = UserResponse::from(entity);
            self.cache.put(&response).await?;
            info!("User {} cached", id);
            Ok(response)
        } else {
            Err(error::SystemError::not_found("User not found"))
        }
    }

    /// Every active user except `excluded_id`.
    pub async fn get_all(&self, excluded_id: Uuid) -> Result<Vec<UserResponse>, error::SystemError> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().filter(|u| u.id != excluded_id).map(UserResponse::from).collect())
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        user: UpdateUserModel,
    ) -> Result<UserResponse, error::SystemError> {
        if user.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let updated = self.repo.update(&id, &user.into()).await?;

        self.cache.invalidate(&id).await?;
        Ok(UserResponse::from(updated))
    }

    pub async fn register(
        &self,
        user: RegisterModel,
    ) -> Result<RegisterResponse, error::SystemError> {
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            username: user.username,
            email: user.email,
            hash_password,
            first_name: user.first_name,
            last_name: user.last_name,
            address: user.address,
            city: user.city,
        };

        let created = self.repo.create(&new_user).await?;
        if created.role == UserRole::Root {
            info!("User {} registered as root", created.id);
        }
        Ok(RegisterResponse { id: created.id, username: created.username })
    }

    pub async fn login(&self, user: LoginModel) -> Result<LoginResponse, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_username(&user.username)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Invalid username or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid username or password"));
        }

        let access_token =
            self.tokens.issue(&user_entity.id, &user_entity.username, &user_entity.role)?;

        self.repo.set_online(&user_entity.id, true).await?;
        self.cache.invalidate(&user_entity.id).await?;

        Ok(LoginResponse {
            access_token,
            id: user_entity.id,
            username: user_entity.username,
            role: user_entity.role,
        })
    }

    pub async fn logout(&self, id: Uuid) -> Result<(), error::SystemError> {
        self.repo.set_online(&id, false).await?;
        self.cache.invalidate(&id).await?;
        Ok(())
    }

    pub async fn promote(&self, id: Uuid) -> Result<UserRole, error::SystemError> {
        self.change_role(id, |role| role.promoted()).await
    }

    pub async fn demote(&self, id: Uuid) -> Result<UserRole, error::SystemError> {
        self.change_role(id, |role| role.demoted()).await
    }

    async fn change_role<F>(&self, id: Uuid, next: F) -> Result<UserRole, error::SystemError>
    where
        F: FnOnce(&UserRole) -> Result<UserRole, error::SystemError>,
    {
        let user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let role = next(&user.role)?;
        if !self.repo.update_role(&id, &role).await? {
            return Err(error::SystemError::not_found("User not found"));
        }

        self.cache.invalidate(&id).await?;
        info!("User {} role changed from {:?} to {:?}", id, user.role, role);
        Ok(role)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), error::SystemError> {
        let user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if user.role == UserRole::Root {
            return Err(error::SystemError::forbidden("Root account cannot be deleted"));
        }

        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("User not found"));
        }

        self.cache.invalidate(&id).await?;
        info!("User {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        modules::relationship::{lifecycle::Transition, repository::RelationshipRepository},
        test::{InMemoryDb, InMemoryRelationshipRepository, InMemoryUserCache, InMemoryUserRepository},
        utils::Claims,
    };

    const SECRET: &[u8] = b"user-service-secret";

    struct Fixture {
        service: UserService,
        db: Arc<InMemoryDb>,
        users: Arc<InMemoryUserRepository>,
        cache: Arc<InMemoryUserCache>,
    }

    fn fixture() -> Fixture {
        let db = Arc::new(InMemoryDb::default());
        let users = Arc::new(InMemoryUserRepository::new(db.clone()));
        let cache = Arc::new(InMemoryUserCache::default());
        let service = UserService::with_dependencies(
            users.clone(),
            cache.clone(),
            TokenIssuer::new(SECRET, 60),
        );
        Fixture { service, db, users, cache }
    }

    fn registration(username: &str) -> RegisterModel {
        RegisterModel {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password: "secret1".to_owned(),
            confirm_password: "secret1".to_owned(),
            first_name: "First".to_owned(),
            last_name: "Last".to_owned(),
            address: None,
            city: None,
        }
    }

    fn login(username: &str, password: &str) -> LoginModel {
        LoginModel { username: username.to_owned(), password: password.to_owned() }
    }

    #[tokio::test]
    async fn first_account_is_root_and_duplicates_conflict() {
        let f = fixture();
        let root = f.service.register(registration("alice")).await.unwrap();
        let member = f.service.register(registration("bob")).await.unwrap();

        assert_eq!(f.users.find_by_id(&root.id).await.unwrap().unwrap().role, UserRole::Root);
        assert_eq!(f.users.find_by_id(&member.id).await.unwrap().unwrap().role, UserRole::User);

        assert!(matches!(
            f.service.register(registration("ALICE")).await,
            Err(error::SystemError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn login_checks_the_password_and_marks_the_user_online() {
        let f = fixture();
        let registered = f.service.register(registration("alice")).await.unwrap();

        assert!(matches!(
            f.service.login(login("alice", "wrong-one")).await,
            Err(error::SystemError::Unauthorized(_))
        ));
        assert!(matches!(
            f.service.login(login("nobody", "secret1")).await,
            Err(error::SystemError::Unauthorized(_))
        ));

        let response = f.service.login(login("alice", "secret1")).await.unwrap();
        assert_eq!(response.id, registered.id);
        assert!(f.users.find_by_id(&registered.id).await.unwrap().unwrap().is_online);

        let claims = Claims::decode(&response.access_token, SECRET).unwrap();
        assert_eq!(claims.sub, registered.id);
        assert_eq!(claims.role, UserRole::Root);

        f.service.logout(registered.id).await.unwrap();
        assert!(!f.users.find_by_id(&registered.id).await.unwrap().unwrap().is_online);
    }

    #[tokio::test]
    async fn details_are_cached_and_updates_invalidate_them() {
        let f = fixture();
        let registered = f.service.register(registration("alice")).await.unwrap();

        f.service.get_by_id(registered.id).await.unwrap();
        assert!(f.cache.contains(&registered.id));

        let empty: UpdateUserModel = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(
            f.service.update_user(registered.id, empty).await,
            Err(error::SystemError::BadRequest(_))
        ));

        let change: UpdateUserModel =
            serde_json::from_value(serde_json::json!({ "firstName": "Alicia" })).unwrap();
        let updated = f.service.update_user(registered.id, change).await.unwrap();
        assert_eq!(updated.first_name, "Alicia");
        assert!(!f.cache.contains(&registered.id));
        assert_eq!(f.service.get_by_id(registered.id).await.unwrap().first_name, "Alicia");
    }

    #[tokio::test]
    async fn roles_move_one_step_and_root_is_fixed() {
        let f = fixture();
        let root = f.service.register(registration("alice")).await.unwrap();
        let member = f.service.register(registration("bob")).await.unwrap();

        assert_eq!(f.service.promote(member.id).await.unwrap(), UserRole::Admin);
        assert!(matches!(
            f.service.promote(member.id).await,
            Err(error::SystemError::BadRequest(_))
        ));
        assert_eq!(f.service.demote(member.id).await.unwrap(), UserRole::User);
        assert!(matches!(f.service.demote(root.id).await, Err(error::SystemError::Forbidden(_))));
    }

    #[tokio::test]
    async fn deleting_a_user_drops_their_relationships_but_root_stays() {
        let f = fixture();
        let relationships = InMemoryRelationshipRepository::new(f.db.clone());
        let root = f.service.register(registration("alice")).await.unwrap();
        let bob = f.service.register(registration("bob")).await.unwrap();
        let carol = f.service.register(registration("carol")).await.unwrap();

        relationships.apply_transition(Transition::Request, &bob.id, &carol.id).await.unwrap();
        relationships.apply_transition(Transition::Request, &root.id, &carol.id).await.unwrap();
        assert_eq!(relationships.len(), 2);

        assert!(matches!(f.service.delete(root.id).await, Err(error::SystemError::Forbidden(_))));

        f.service.delete(carol.id).await.unwrap();
        assert_eq!(relationships.len(), 0);
        assert!(f.users.find_by_id(&carol.id).await.unwrap().is_none());
        assert!(matches!(f.service.delete(carol.id).await, Err(error::SystemError::NotFound(_))));
    }
}
