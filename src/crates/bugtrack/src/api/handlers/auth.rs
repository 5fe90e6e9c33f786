//! Signup, login and session endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::auth::{LoginRequest, SessionResponse, SignupRequest},
    response,
    routes::AppState,
};
use crate::auth::{CurrentUser, LoggedInUser};
use crate::db::repositories::UserRepository;

/// Register and log in
///
/// POST /api/v1/auth/signup
pub async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;

    let mut user = UserRepository::create(&app_state.db, &req.username, &req.fullname)
        .await
        .map_err(|e| {
            if e.is_constraint_violation() {
                ApiError::Conflict(format!("username {} is already taken", req.username.trim()))
            } else {
                ApiError::from(e)
            }
        })?;
    if app_state.is_bootstrap_admin(&user.username) {
        user = UserRepository::set_admin(&app_state.db, &user.username, true).await?;
        tracing::info!("Granted admin rights to {}", user.username);
    }
    let user = LoggedInUser::from(&user);
    let token = app_state.sessions.create(user.clone());

    tracing::info!("Signed up {}", user.username);
    Ok(response::created(SessionResponse { token, user }))
}

/// Log in as an existing user
///
/// POST /api/v1/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let user = UserRepository::get_by_username(&app_state.db, req.username.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("unknown username".to_string()))?;
    let user = LoggedInUser::from(&user);
    let token = app_state.sessions.create(user.clone());

    tracing::info!("Logged in {}", user.username);
    Ok(response::ok(SessionResponse { token, user }))
}

/// End the current session
///
/// POST /api/v1/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    app_state.sessions.revoke(&current.token);

    tracing::info!("Logged out {}", current.user.username);
    Ok(response::no_content())
}

/// The logged-in user
///
/// GET /api/v1/auth/me
pub async fn me(CurrentUser { user, .. }: CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(response::ok(user))
}
