use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::models::user::Role;
use crate::session::SessionUser;
use crate::state::AppState;

/// Any caller holding a valid session. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

/// A caller whose session role is `admin`. Wrong role is a 401, same as no session.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .read(&parts.headers)
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::warn!(user_id = user.id, "non-admin session rejected from admin route");
            return Err(AppError::Unauthorized);
        }
        Ok(AdminUser(user))
    }
}
