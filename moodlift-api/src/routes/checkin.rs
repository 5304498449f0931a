//! Check-in endpoints

use axum::extract::State;
use axum::{Extension, Json};

use crate::dto::{CheckinInfoResponse, CheckinResponse};
use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Read-only streak preview
pub async fn info(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<CheckinInfoResponse>> {
    let info = state.checkins.info(&auth.user_id).await?;
    Ok(Json(info.into()))
}

/// Commit today's check-in
pub async fn checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<CheckinResponse>> {
    let outcome = state.checkins.checkin(&auth.user_id).await?;
    Ok(Json(outcome.into()))
}
