//! In-memory repositories for service tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        audit::{model::NewLogEntry, repository::AuditRepository, schema::LogEntity},
        post::{
            model::NewPost,
            repository::PostRepository,
            schema::{PostEntity, TimelinePost},
        },
        relationship::{
            lifecycle::{self, Mutation, Transition, UserPair},
            repository::RelationshipRepository,
            schema::{RelationshipEntity, RelationshipStatus},
        },
        user::{
            cache::UserCache,
            model::{InsertUser, UpdateUser, UserResponse},
            repository::UserRepository,
            schema::{UserEntity, UserRole},
        },
    },
};

/// Tables shared by the in-memory repositories. Locks are taken in field
/// order.
#[derive(Default)]
pub struct InMemoryDb {
    users: Mutex<Vec<UserEntity>>,
    relationships: Mutex<Vec<RelationshipEntity>>,
    posts: Mutex<Vec<PostEntity>>,
    likes: Mutex<Vec<(Uuid, Uuid)>>,
}

impl InMemoryDb {
    fn active_users(&self) -> Vec<UserEntity> {
        self.users.lock().unwrap().iter().filter(|u| u.deleted_at.is_none()).cloned().collect()
    }

    fn is_active(&self, id: &Uuid) -> bool {
        self.users.lock().unwrap().iter().any(|u| u.id == *id && u.deleted_at.is_none())
    }
}

pub struct InMemoryUserRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryUserRepository {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }

    /// Adds an active USER and returns its id.
    pub fn seed(&self, username: &str, first_name: &str, last_name: &str) -> Uuid {
        let now = chrono::Utc::now();
        let user = UserEntity {
            id: Uuid::now_v7(),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            hash_password: String::new(),
            role: UserRole::User,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            address: None,
            city: None,
            profile_pic_url: None,
            background_image_url: None,
            is_online: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.db.users.lock().unwrap().push(user);
        id
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.db.active_users().into_iter().find(|u| u.id == *id))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        Ok(self.db.active_users().into_iter().filter(|u| ids.contains(&u.id)).collect())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.db.active_users().into_iter().find(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let mut users = self.db.active_users();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut users = self.db.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.deleted_at.is_none() && u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(error::SystemError::conflict("Username already exists"));
        }

        let now = chrono::Utc::now();
        let role = if users.is_empty() { UserRole::Root } else { UserRole::User };
        let entity = UserEntity {
            id: Uuid::now_v7(),
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            profile_pic_url: None,
            background_image_url: None,
            is_online: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        users.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut users = self.db.users.lock().unwrap();
        let entity = users
            .iter_mut()
            .find(|u| u.id == *id && u.deleted_at.is_none())
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        if let Some(username) = &user.username {
            entity.username = username.clone();
        }
        if let Some(email) = &user.email {
            entity.email = email.clone();
        }
        if let Some(first_name) = &user.first_name {
            entity.first_name = first_name.clone();
        }
        if let Some(last_name) = &user.last_name {
            entity.last_name = last_name.clone();
        }
        entity.updated_at = chrono::Utc::now();
        Ok(entity.clone())
    }

    async fn update_role(&self, id: &Uuid, role: &UserRole) -> Result<bool, error::SystemError> {
        let mut users = self.db.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == *id && u.deleted_at.is_none()) {
            Some(entity) => {
                entity.role = role.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_online(&self, id: &Uuid, online: bool) -> Result<bool, error::SystemError> {
        let mut users = self.db.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == *id && u.deleted_at.is_none()) {
            Some(entity) => {
                entity.is_online = online;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Soft-deletes the user and drops every relationship row they are in.
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut users = self.db.users.lock().unwrap();
        let Some(entity) = users.iter_mut().find(|u| u.id == *id && u.deleted_at.is_none()) else {
            return Ok(false);
        };
        entity.deleted_at = Some(chrono::Utc::now());
        entity.is_online = false;

        self.db.relationships.lock().unwrap().retain(|r| !r.involves(id));
        Ok(true)
    }
}

/// Applies transitions through the same planner as the Postgres repository.
pub struct InMemoryRelationshipRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryRelationshipRepository {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }

    pub fn len(&self) -> usize {
        self.db.relationships.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl RelationshipRepository for InMemoryRelationshipRepository {
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        status: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let rows = self.db.relationships.lock().unwrap();
        let mut found: Vec<RelationshipEntity> = rows
            .iter()
            .filter(|r| r.involves(user_id) && status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn find_candidates(
        &self,
        user_id: &Uuid,
        needle: Option<&str>,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = self.db.active_users();
        let rows = self.db.relationships.lock().unwrap();
        let needle = needle.map(str::to_lowercase);

        let mut found: Vec<UserEntity> = users
            .into_iter()
            .filter(|u| u.id != *user_id)
            .filter(|u| !rows.iter().any(|r| r.involves(user_id) && r.involves(&u.id)))
            .filter(|u| match &needle {
                None => true,
                Some(needle) => {
                    format!("{} {}", u.first_name, u.last_name).to_lowercase().contains(needle)
                        || u.username.to_lowercase().contains(needle)
                }
            })
            .collect();
        found.sort_by_key(|u| u.id);
        Ok(found)
    }

    async fn apply_transition(
        &self,
        transition: Transition,
        actor_id: &Uuid,
        other_id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let pair = UserPair::new(*actor_id, *other_id)?;
        if !self.db.is_active(actor_id) || !self.db.is_active(other_id) {
            return Err(error::SystemError::not_found("User not found"));
        }

        let mut rows = self.db.relationships.lock().unwrap();
        let existing = rows
            .iter()
            .find(|r| r.user_one_id == pair.user_one() && r.user_two_id == pair.user_two());

        match lifecycle::plan(transition, *actor_id, pair, existing)? {
            Mutation::Insert { pair, requester_id } => {
                let now = chrono::Utc::now();
                let row = RelationshipEntity {
                    id: Uuid::now_v7(),
                    user_one_id: pair.user_one(),
                    user_two_id: pair.user_two(),
                    requester_id,
                    status: RelationshipStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };
                rows.push(row.clone());
                Ok(Some(row))
            }
            Mutation::Accept { id } => {
                let row = rows
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| error::SystemError::not_found("Relationship not found"))?;
                row.status = RelationshipStatus::Accepted;
                row.updated_at = chrono::Utc::now();
                Ok(Some(row.clone()))
            }
            Mutation::Delete { id } => {
                rows.retain(|r| r.id != id);
                Ok(None)
            }
        }
    }
}

pub struct InMemoryPostRepository {
    db: Arc<InMemoryDb>,
}

impl InMemoryPostRepository {
    pub fn new(db: Arc<InMemoryDb>) -> Self {
        Self { db }
    }

    fn like_count(&self, post_id: &Uuid) -> i64 {
        self.db.likes.lock().unwrap().iter().filter(|(p, _)| p == post_id).count() as i64
    }
}

#[async_trait::async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: &NewPost) -> Result<PostEntity, error::SystemError> {
        let mut posts = self.db.posts.lock().unwrap();
        // Strictly increasing timestamps keep the newest-first order stable.
        let created_at = posts
            .iter()
            .map(|p| p.created_at + chrono::Duration::milliseconds(1))
            .fold(chrono::Utc::now(), |a, b| a.max(b));
        let entity = PostEntity {
            id: Uuid::now_v7(),
            author_id: post.author_id,
            timeline_user_id: post.timeline_user_id,
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            created_at,
        };
        posts.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        Ok(self.db.posts.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn find_by_timeline(
        &self,
        timeline_user_id: &Uuid,
    ) -> Result<Vec<TimelinePost>, error::SystemError> {
        let mut posts: Vec<PostEntity> = self
            .db
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.timeline_user_id == *timeline_user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .map(|post| {
                let like_count = self.like_count(&post.id);
                TimelinePost { post, like_count }
            })
            .collect())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut posts = self.db.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != *id);
        if posts.len() == before {
            return Ok(false);
        }
        self.db.likes.lock().unwrap().retain(|(p, _)| p != id);
        Ok(true)
    }

    async fn add_like(&self, post_id: &Uuid, user_id: &Uuid) -> Result<i64, error::SystemError> {
        {
            let mut likes = self.db.likes.lock().unwrap();
            if likes.contains(&(*post_id, *user_id)) {
                return Err(error::SystemError::conflict("Like already exists"));
            }
            likes.push((*post_id, *user_id));
        }
        Ok(self.like_count(post_id))
    }
}

#[derive(Default)]
pub struct InMemoryUserCache {
    entries: Mutex<HashMap<Uuid, UserResponse>>,
}

impl InMemoryUserCache {
    pub fn contains(&self, id: &Uuid) -> bool {
        self.entries.lock().unwrap().contains_key(id)
    }
}

#[async_trait::async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, id: &Uuid) -> Result<Option<UserResponse>, error::SystemError> {
        Ok(self.entries.lock().unwrap().get(id).cloned())
    }

    async fn put(&self, user: &UserResponse) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn invalidate(&self, id: &Uuid) -> Result<(), error::SystemError> {
        self.entries.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Keeps entries newest first.
#[derive(Default)]
pub struct InMemoryAuditRepository {
    entries: Mutex<Vec<LogEntity>>,
}

#[async_trait::async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn create(&self, entry: &NewLogEntry) -> Result<LogEntity, error::SystemError> {
        let log = LogEntity {
            id: Uuid::now_v7(),
            method: entry.method.clone(),
            username: entry.username.clone(),
            table_name: entry.table_name.clone(),
            action: entry.action.clone(),
            time: chrono::Utc::now(),
        };
        self.entries.lock().unwrap().insert(0, log.clone());
        Ok(log)
    }

    async fn find_all(&self) -> Result<Vec<LogEntity>, error::SystemError> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<LogEntity>, error::SystemError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().filter(|l| l.username == username).cloned().collect())
    }

    async fn delete_all(&self) -> Result<u64, error::SystemError> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }

    async fn delete_by_username(&self, username: &str) -> Result<u64, error::SystemError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|l| l.username != username);
        Ok((before - entries.len()) as u64)
    }
}
