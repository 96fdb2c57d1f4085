use sqlx::FromRow;
use uuid::Uuid;

use super::credential::Credential;

/// User record in the database.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String, // argon2 PHC string
    pub image_url: String,
    pub bio: String,
}

/// Registered user. The password is only reachable through `check_password`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub credential: Credential,
    pub image_url: String,
    pub bio: String,
}

impl User {
    pub fn check_password(&self, plain: &str) -> bool {
        self.credential.verify(plain)
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            username: r.username,
            credential: Credential::from_stored(r.password_hash),
            image_url: r.image_url,
            bio: r.bio,
        }
    }
}
