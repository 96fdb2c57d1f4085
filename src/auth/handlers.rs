use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest, MessageResponse, PublicUser},
        services::{authenticate, create_user},
        session::Session,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/check_session", get(check_session))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;

    let user = create_user(
        state.users.as_ref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .await?;

    let (_, jar) = Session::start(&state, jar, user.id).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully",
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;

    let user = authenticate(
        state.users.as_ref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .await?;

    let (_, jar) = Session::start(&state, jar, user.id).await?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            message: "Logged in successfully",
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let jar = Session::end(&state, jar).await?;
    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    ))
}

#[instrument(skip(state))]
pub async fn check_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.users.find_by_id(session.user_id).await?;

    match user {
        Some(user) => Ok(Json(user.into())),
        None => {
            error!(user_id = %session.user_id, "session references missing user");
            Err(AppError::NotFound("User not found".into()))
        }
    }
}
