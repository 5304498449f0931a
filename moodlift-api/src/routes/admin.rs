//! Moderation endpoints
//!
//! Every handler re-reads the caller's account and requires the admin
//! flag; non-admins get 403 regardless of what exists at the path.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use moodlift_db::UserEntity;

use crate::dto::{AdminStatsResponse, MessageResponse, ReportedContentResponse};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

async fn require_admin(state: &AppState, auth: &AuthUser) -> ApiResult<UserEntity> {
    let user = state
        .accounts
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(user)
}

/// Soft-delete a content item
pub async fn delete_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    require_admin(&state, &auth).await?;

    let found = state.admin.delete_content(&content_id).await?;
    if !found {
        return Err(ApiError::NotFound("Content not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Content deleted")))
}

/// Reported content with each item's report rows, most-reported first
pub async fn reported(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<ReportedContentResponse>>> {
    require_admin(&state, &auth).await?;

    let items = state.admin.reported().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Platform-wide counters
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<AdminStatsResponse>> {
    require_admin(&state, &auth).await?;

    let stats = state.admin.stats().await?;
    Ok(Json(stats.into()))
}
