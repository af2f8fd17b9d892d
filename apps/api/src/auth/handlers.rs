use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_decoy, verify_password};
use crate::errors::AppError;
use crate::models::user::{LoginRequest, NewUser, RegisterRequest, Role};
use crate::session::{CurrentUser, SessionUser};
use crate::state::AppState;
use crate::validation::ValidJson;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

/// POST /login
///
/// Unknown email and wrong password produce the same 401.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<AuthResponse>), AppError> {
    let user = state.users.find_by_email(&request.email).await?;

    let verified = match &user {
        Some(user) => verify_password(&request.password, &user.password_hash).await?,
        None => verify_decoy(&request.password, state.config.bcrypt_cost).await?,
    };
    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!("Rejected login attempt");
            return Err(AppError::InvalidCredentials);
        }
    };

    let session = SessionUser::from(&user);
    let jar = state.sessions.seal(jar, &session)?;
    info!(user_id = user.id, role = ?user.role, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            message: "Login successful",
            user: session,
        }),
    ))
}

/// POST /register
///
/// Always creates a `user`-role account. Does not log the caller in.
pub async fn handle_register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let password_hash = hash_password(&request.password, state.config.bcrypt_cost).await?;
    let created = state
        .users
        .create(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?
        .ok_or_else(|| AppError::Validation("Email already registered".to_string()))?;

    info!(user_id = created.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully",
            user: SessionUser::from(&created),
        }),
    ))
}

/// POST /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<LogoutResponse>) {
    (
        state.sessions.clear(jar),
        Json(LogoutResponse { success: true }),
    )
}

/// GET /session
pub async fn handle_session(CurrentUser(user): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse { user })
}
