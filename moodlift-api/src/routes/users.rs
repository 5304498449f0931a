//! User statistics endpoints

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::dto::{Pagination, PointsHistoryResponse, UserStatsResponse};
use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for the points history; a larger default page than
/// the content listings
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQueryParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

/// Page through the caller's points ledger, newest first
pub async fn points_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<HistoryQueryParams>,
) -> ApiResult<Json<PointsHistoryResponse>> {
    let (entries, total) = state
        .accounts
        .points_history(&auth.user_id, params.page, params.limit)
        .await?;

    let total_pages = if params.limit == 0 {
        0
    } else {
        (total + i64::from(params.limit) - 1) / i64::from(params.limit)
    };

    Ok(Json(PointsHistoryResponse {
        transactions: entries.into_iter().map(Into::into).collect(),
        pagination: Pagination {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
        },
    }))
}

/// Aggregate statistics for the caller
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<UserStatsResponse>> {
    let stats = state.accounts.stats(&auth.user_id).await?;
    Ok(Json(stats.into()))
}
