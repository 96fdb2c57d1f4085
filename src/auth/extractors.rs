use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::session::{Session, SESSION_COOKIE};
use crate::{error::AppError, state::AppState};

/// Requires an authenticated session cookie; rejects with 401 otherwise.
#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            debug!("missing session cookie");
            return Err(AppError::Unauthorized);
        };

        match Session::resolve(state, cookie.value()).await? {
            Some(session) => Ok(session),
            None => {
                warn!("unknown or expired session");
                Err(AppError::Unauthorized)
            }
        }
    }
}
