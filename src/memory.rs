//! In-memory storage used by tests in place of Postgres.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    auth::{credential::Credential, repo::UserRepo, repo_types::User, session::{SessionRecord, SessionStore}},
    error::StoreError,
    recipes::{repo::RecipeRepo, repo_types::Recipe, validation::NewRecipe},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    sessions: Vec<SessionRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    pub async fn delete_user(&self, id: Uuid) {
        let mut t = self.tables.lock().await;
        t.users.retain(|u| u.id != id);
        t.recipes.retain(|r| r.user_id != id);
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, username: &str, credential: &Credential) -> Result<User, StoreError> {
        let mut t = self.tables.lock().await;
        if t.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            credential: credential.clone(),
            image_url: "default.jpg".into(),
            bio: "No bio".into(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl RecipeRepo for MemoryStore {
    async fn insert(&self, owner_id: Uuid, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        let mut t = self.tables.lock().await;
        if !t.users.iter().any(|u| u.id == owner_id) {
            return Err(StoreError::MissingReference);
        }
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: recipe.title().to_string(),
            instructions: recipe.instructions().to_string(),
            minutes_to_complete: recipe.minutes_to_complete(),
            user_id: owner_id,
        };
        t.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.recipes
            .iter()
            .filter(|r| r.user_id == owner_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let mut t = self.tables.lock().await;
        if t.sessions.iter().any(|s| s.token_hash == record.token_hash) {
            return Err(StoreError::Conflict);
        }
        t.sessions.push(record.clone());
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError> {
        let t = self.tables.lock().await;
        Ok(t.sessions.iter().find(|s| s.token_hash == token_hash).cloned())
    }

    async fn delete(&self, token_hash: &str) -> Result<(), StoreError> {
        self.tables
            .lock()
            .await
            .sessions
            .retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError> {
        let mut t = self.tables.lock().await;
        let before = t.sessions.len();
        t.sessions.retain(|s| !s.is_expired_at(now));
        Ok((before - t.sessions.len()) as u64)
    }
}
