//! Account endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use moodlift_db::StoreError;

use crate::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    UpdateProfileRequest, UserResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{issue_token, AuthUser};
use crate::state::AppState;

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (email, username, password) = match (req.email, req.username, req.password) {
        (Some(e), Some(u), Some(p)) if !e.is_empty() && !u.is_empty() && !p.is_empty() => (e, u, p),
        _ => {
            return Err(ApiError::Validation(
                "Email, username, and password are required".to_string(),
            ))
        }
    };

    let user = state
        .accounts
        .register(&email, &username, &password)
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists(_) => {
                ApiError::Conflict("Email or username already exists".to_string())
            }
            other => other.into(),
        })?;

    let token = issue_token(&user.user_id, &state.jwt)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ))
        }
    };

    let user = state
        .accounts
        .verify_credentials(&email, &password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = issue_token(&user.user_id, &state.jwt)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Current user's profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .accounts
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Update profile fields; absent fields keep their current values
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .accounts
        .update_profile(
            &auth.user_id,
            req.username,
            req.notification_time,
            req.notifications_enabled,
        )
        .await?;

    Ok(Json(user.into()))
}

/// Rotate the account password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (current, new) = match (req.current_password, req.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(ApiError::Validation(
                "Current password and new password are required".to_string(),
            ))
        }
    };

    let changed = state
        .accounts
        .change_password(&auth.user_id, &current, &new)
        .await?;
    if !changed {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
