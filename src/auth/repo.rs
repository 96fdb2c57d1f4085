use async_trait::async_trait;
use uuid::Uuid;

use super::{
    credential::Credential,
    repo_types::{User, UserRow},
};
use crate::{db::PgStore, error::StoreError};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a user. A taken username yields `StoreError::Conflict` and
    /// leaves nothing behind.
    async fn create(&self, username: &str, credential: &Credential) -> Result<User, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, username: &str, credential: &Credential) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await?;

        let inserted = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, image_url, bio
            "#,
        )
        .bind(username)
        .bind(credential.phc())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(row.into())
            }
            Err(e) => {
                tx.rollback().await?;
                Err(StoreError::from_sqlx(e))
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, image_url, bio
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, image_url, bio
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(User::from))
    }
}
