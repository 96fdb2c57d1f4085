use lazy_static::lazy_static;
use tracing::{error, warn};

use super::{credential::Credential, repo::UserRepo, repo_types::User};
use crate::error::{AppError, StoreError};

pub const MAX_USERNAME_CHARS: usize = 80;

const CREDENTIALS_REQUIRED: &str = "Username and password are required";

lazy_static! {
    /// Verified against when the username is unknown so both login failures
    /// cost one argon2 verification.
    static ref DUMMY_CREDENTIAL: Option<Credential> =
        Credential::hash("recipebox-unknown-user").ok();
}

/// Both fields present and non-empty, or a validation error.
pub fn require_credentials<'a>(
    username: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), AppError> {
    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(AppError::Validation(CREDENTIALS_REQUIRED.into())),
    }
}

/// Register a new user with an irreversibly hashed password.
pub async fn create_user(
    users: &dyn UserRepo,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, AppError> {
    let (username, password) = require_credentials(username, password)?;

    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_CHARS} characters."
        )));
    }

    let credential = Credential::hash(password)?;

    match users.create(username, &credential).await {
        Ok(user) => Ok(user),
        Err(StoreError::Conflict) => {
            warn!(%username, "username already exists");
            Err(AppError::Conflict("Username already exists".into()))
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Err(e.into())
        }
    }
}

/// Look up `username` and check `password` against its stored hash.
pub async fn authenticate(
    users: &dyn UserRepo,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, AppError> {
    let (username, password) = require_credentials(username, password)?;

    let Some(user) = users.find_by_username(username).await? else {
        if let Some(dummy) = DUMMY_CREDENTIAL.as_ref() {
            let _ = dummy.verify(password);
        }
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !user.check_password(password) {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn created_user_verifies_only_its_password() {
        let store = MemoryStore::default();
        let user = create_user(&store, Some("alice"), Some("secret1"))
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.image_url, "default.jpg");
        assert_eq!(user.bio, "No bio");
        assert!(user.check_password("secret1"));
        assert!(!user.check_password("secret2"));
        assert!(!user.check_password(""));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_and_keeps_one_record() {
        let store = MemoryStore::default();
        create_user(&store, Some("alice"), Some("secret1"))
            .await
            .unwrap();

        let err = create_user(&store, Some("alice"), Some("other-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Username already exists"));
        assert_eq!(store.user_count().await, 1);

        let kept = store.find_by_username("alice").await.unwrap().unwrap();
        assert!(kept.check_password("secret1"));
    }

    #[tokio::test]
    async fn missing_or_empty_fields_are_rejected() {
        let store = MemoryStore::default();
        for (u, p) in [
            (None, Some("pw")),
            (Some("bob"), None),
            (Some(""), Some("pw")),
            (Some("bob"), Some("")),
            (None, None),
        ] {
            let err = create_user(&store, u, p).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == CREDENTIALS_REQUIRED));
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn overlong_username_is_a_validation_error() {
        let store = MemoryStore::default();
        let name = "x".repeat(MAX_USERNAME_CHARS + 1);
        let err = create_user(&store, Some(&name), Some("pw")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let name = "x".repeat(MAX_USERNAME_CHARS);
        assert!(create_user(&store, Some(&name), Some("pw")).await.is_ok());
    }

    #[tokio::test]
    async fn authenticate_checks_username_and_password() {
        let store = MemoryStore::default();
        let created = create_user(&store, Some("carol"), Some("hunter22"))
            .await
            .unwrap();

        let user = authenticate(&store, Some("carol"), Some("hunter22"))
            .await
            .unwrap();
        assert_eq!(user.id, created.id);

        let err = authenticate(&store, Some("carol"), Some("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = authenticate(&store, Some("dave"), Some("hunter22"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = authenticate(&store, Some("carol"), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_username_still_runs_a_verification() {
        let store = MemoryStore::default();
        let err = authenticate(&store, Some("nobody"), Some("recipebox-unknown-user"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let dummy = DUMMY_CREDENTIAL.as_ref().expect("dummy credential hashes");
        assert!(dummy.verify("recipebox-unknown-user"));
        assert!(!dummy.verify("hunter22"));
    }
}
