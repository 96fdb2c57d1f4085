use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::SessionConfig,
    db::PgStore,
    error::{AppError, StoreError},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "session_id";

const TOKEN_BYTES: usize = 32;

/// Server-side half of a session. Only the digest of the cookie value is kept.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError>;
    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError>;
    async fn delete(&self, token_hash: &str) -> Result<(), StoreError>;
    /// Drop every session that expired at or before `now`; returns how many.
    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError>;
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.token_hash)
        .bind(record.user_id)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError> {
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT token_hash, user_id, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }

    async fn delete(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected())
    }
}

/// Fresh opaque session identifier handed to the client.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64UrlUnpadded::encode_string(&bytes)
}

pub fn hash_token(token: &str) -> String {
    Base64UrlUnpadded::encode_string(&Sha256::digest(token.as_bytes()))
}

fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(config.ttl())
        .build()
}

/// An authenticated client session.
///
/// Obtained either by extraction from a request (see `auth::extractors`) or
/// by `Session::start` after a successful signup or login. Destroyed by
/// `Session::end`.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub user_id: Uuid,
}

impl Session {
    /// Persist a new session for `user_id` and attach its cookie to `jar`.
    ///
    /// Any session the incoming cookie still points at is revoked first, and
    /// expired records are purged.
    pub async fn start(
        state: &AppState,
        jar: CookieJar,
        user_id: Uuid,
    ) -> Result<(Self, CookieJar), AppError> {
        if let Some(previous) = jar.get(SESSION_COOKIE) {
            state.sessions.delete(&hash_token(previous.value())).await?;
            debug!(%user_id, "previous session revoked");
        }

        let now = OffsetDateTime::now_utc();
        let purged = state.sessions.purge_expired(now).await?;
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }

        let token = generate_token();
        let record = SessionRecord {
            token_hash: hash_token(&token),
            user_id,
            created_at: now,
            expires_at: now + state.config.session.ttl(),
        };
        state.sessions.insert(&record).await?;
        debug!(%user_id, "session started");

        let jar = jar.add(session_cookie(token, &state.config.session));
        Ok((Self { user_id }, jar))
    }

    /// Forget whatever session the cookie points at and clear the cookie.
    /// Succeeds when there is no session.
    pub async fn end(state: &AppState, jar: CookieJar) -> Result<CookieJar, AppError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(jar);
        };
        state.sessions.delete(&hash_token(cookie.value())).await?;
        debug!("session ended");
        Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
    }

    /// Look up the session behind `token`. Expired records are removed.
    pub async fn resolve(state: &AppState, token: &str) -> Result<Option<Self>, AppError> {
        let token_hash = hash_token(token);
        let Some(record) = state.sessions.find(&token_hash).await? else {
            return Ok(None);
        };
        if record.is_expired_at(OffsetDateTime::now_utc()) {
            state.sessions.delete(&token_hash).await?;
            debug!(user_id = %record.user_id, "expired session dropped");
            return Ok(None);
        }
        Ok(Some(Self {
            user_id: record.user_id,
        }))
    }
}
