//! Saved item endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::dto::{MessageResponse, SavedItemResponse, SavedQueryParams};
use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// The caller's saved items, optionally filtered by category
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<SavedQueryParams>,
) -> ApiResult<Json<Vec<SavedItemResponse>>> {
    let items = state
        .engagement
        .saved(&auth.user_id, params.category.as_deref())
        .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Save a content item; saving twice is a no-op
pub async fn save(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    state.engagement.save(&auth.user_id, &content_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Content saved")),
    ))
}

/// Remove a saved item
pub async fn unsave(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.engagement.unsave(&auth.user_id, &content_id).await?;
    Ok(Json(MessageResponse::new("Saved item removed")))
}
