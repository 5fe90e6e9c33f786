//! User endpoint handlers

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::api::{
    error::{ApiError, ApiResult},
    models::user::UserListQuery,
    response,
    routes::AppState,
};
use crate::auth::AdminUser;
use crate::db::repositories::UserRepository;

/// List users
///
/// GET /api/v1/users
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<UserListQuery>,
) -> ApiResult<impl IntoResponse> {
    let users = UserRepository::list(&app_state.db, &params.into()).await;
    Ok(response::ok(users))
}

/// Get a user by ID
///
/// GET /api/v1/users/:id
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::get_by_id(&app_state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(response::ok(user))
}

/// Delete a user and end their sessions. Bugs they filed are kept.
///
/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if admin.id == id {
        return Err(ApiError::BadRequest("admins cannot delete themselves".to_string()));
    }

    let removed = UserRepository::delete(&app_state.db, &id).await?;
    let sessions = app_state.sessions.revoke_user(&removed.id);

    tracing::info!("Deleted user {} ({} sessions revoked)", removed.username, sessions);
    Ok(response::no_content())
}
