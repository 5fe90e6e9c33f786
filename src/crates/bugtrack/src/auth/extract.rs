//! Request extractors that resolve the caller's session
//!
//! Handlers name the identity they need in their signature instead of
//! reading shared state: [`CurrentUser`] rejects anonymous requests with
//! 401, [`AdminUser`] additionally rejects non-admins with 403, and
//! [`MaybeUser`] never rejects.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use super::LoggedInUser;
use crate::api::{error::ApiError, routes::AppState};

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A logged-in caller, plus the token it authenticated with
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: LoggedInUser,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let user = state
            .sessions
            .resolve(token)
            .ok_or_else(|| ApiError::Unauthorized("unknown or expired session".to_string()))?;

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

/// A logged-in admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub LoggedInUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden("admin rights required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

/// The caller's identity, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<LoggedInUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            bearer_token(parts).and_then(|token| state.sessions.resolve(token)),
        ))
    }
}
