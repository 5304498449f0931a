//! Content endpoints: feed, browsing, the daily set, submissions, votes,
//! reports, and unlocks

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use moodlift_db::{NewContent, StoreError};

use crate::dto::{
    ContentResponse, DailyItemResponse, ListQueryParams, MessageResponse, PaginatedResponse,
    ReportRequest, SubmitContentRequest, UnlockResponse, VoteRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn sort_mode(params: &ListQueryParams) -> &str {
    params.sort.as_deref().unwrap_or("newest")
}

/// Community feed of user-submitted content
pub async fn feed(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Query(params): Query<ListQueryParams>,
) -> ApiResult<Json<PaginatedResponse<ContentResponse>>> {
    let viewer_id = viewer.as_ref().map(|v| v.user_id.as_str());
    let (items, total) = state
        .content
        .feed(viewer_id, params.page, params.limit, sort_mode(&params))
        .await?;

    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(Into::into).collect(),
        total,
        params.page,
        params.limit,
    )))
}

/// Browse active content in a category
pub async fn browse(
    State(state): State<AppState>,
    Path(category): Path<String>,
    viewer: Option<Extension<AuthUser>>,
    Query(params): Query<ListQueryParams>,
) -> ApiResult<Json<PaginatedResponse<ContentResponse>>> {
    let viewer_id = viewer.as_ref().map(|v| v.user_id.as_str());
    let (items, total) = state
        .content
        .browse(
            &category,
            viewer_id,
            params.page,
            params.limit,
            sort_mode(&params),
        )
        .await?;

    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(Into::into).collect(),
        total,
        params.page,
        params.limit,
    )))
}

/// The caller's own submissions
pub async fn mine(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListQueryParams>,
) -> ApiResult<Json<PaginatedResponse<ContentResponse>>> {
    let (items, total) = state
        .content
        .mine(&auth.user_id, params.page, params.limit)
        .await?;

    Ok(Json(PaginatedResponse::new(
        items.into_iter().map(Into::into).collect(),
        total,
        params.page,
        params.limit,
    )))
}

/// Today's assigned content set for a category
pub async fn daily(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<DailyItemResponse>>> {
    let items = state.daily.daily(&auth.user_id, &category).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Submit a new content item; awards one point
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SubmitContentRequest>,
) -> ApiResult<(StatusCode, Json<ContentResponse>)> {
    let Some(category) = req.category.filter(|c| !c.trim().is_empty()) else {
        return Err(ApiError::Validation("Category is required".to_string()));
    };

    let submission = NewContent {
        category,
        content_type: req.content_type,
        content_text: req.content_text,
        question: req.question,
        answer: req.answer,
        option_a: req.option_a,
        option_b: req.option_b,
        option_c: req.option_c,
        option_d: req.option_d,
        correct_option: req.correct_option,
        author: req.author,
    };

    let created = state.content.submit(&auth.user_id, submission).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Cast or overwrite a vote; returns the freshly hydrated item
pub async fn vote(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<ContentResponse>> {
    let Some(vote_type) = req.vote_type else {
        return Err(ApiError::Validation(
            "vote_type must be \"up\" or \"down\"".to_string(),
        ));
    };

    let item = state
        .engagement
        .vote(&auth.user_id, &content_id, &vote_type)
        .await?;
    Ok(Json(item.into()))
}

/// Report a content item; duplicate reports are a no-op
pub async fn report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let Some(reason) = req.reason.filter(|r| !r.trim().is_empty()) else {
        return Err(ApiError::Validation("Reason is required".to_string()));
    };

    state
        .engagement
        .report(&auth.user_id, &content_id, &reason)
        .await?;
    Ok(Json(MessageResponse::new("Report submitted")))
}

/// Spend points to unlock a content item
pub async fn unlock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(content_id): Path<String>,
) -> ApiResult<Json<UnlockResponse>> {
    let outcome = state
        .engagement
        .unlock(&auth.user_id, &content_id)
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists(_) => ApiError::AlreadyUnlocked,
            other => other.into(),
        })?;

    Ok(Json(UnlockResponse {
        message: "Content unlocked".to_string(),
        points_spent: outcome.points_spent,
        remaining_balance: outcome.remaining_balance,
    }))
}
