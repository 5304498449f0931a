//! Data Transfer Objects for API requests and responses
//!
//! Request fields that the original clients may omit are `Option`s so
//! missing input surfaces as a 400 with a message rather than a
//! deserialization rejection.

use chrono::{DateTime, Utc};
use moodlift_db::{
    AdminStats, CheckinInfo, CheckinOutcome, ContentEntity, DailyItem, HydratedContent,
    LedgerEntryEntity, ReportedContent, SavedItemDetail, UserEntity, UserStats,
};
use serde::{Deserialize, Serialize};

// ============ Auth DTOs ============

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update request; absent fields keep their current values
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub notification_time: Option<String>,
    pub notifications_enabled: Option<bool>,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// User profile response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub points_balance: i64,
    pub total_points_earned: i64,
    pub current_streak: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub total_checkins: i64,
    pub notification_time: Option<String>,
    pub notifications_enabled: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(user: UserEntity) -> Self {
        let last_checkin = user.last_checkin_time();
        Self {
            id: user.user_id,
            email: user.email,
            username: user.username,
            points_balance: user.points_balance,
            total_points_earned: user.total_points_earned,
            current_streak: user.current_streak,
            last_checkin,
            total_checkins: user.total_checkins,
            notification_time: user.notification_time,
            notifications_enabled: user.notifications_enabled,
            is_admin: user.is_admin,
            created_at: user.created_at.0,
        }
    }
}

/// Token + user pair returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ============ Check-in DTOs ============

/// Read-only check-in preview
#[derive(Debug, Serialize)]
pub struct CheckinInfoResponse {
    pub current_streak: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub total_checkins: i64,
    pub can_checkin: bool,
    pub next_points: i64,
}

impl From<CheckinInfo> for CheckinInfoResponse {
    fn from(info: CheckinInfo) -> Self {
        Self {
            current_streak: info.current_streak,
            last_checkin: info.last_checkin,
            total_checkins: info.total_checkins,
            can_checkin: info.can_checkin,
            next_points: info.next_points,
        }
    }
}

/// Post-commit check-in snapshot
#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub current_streak: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub total_checkins: i64,
    pub points_earned: i64,
    pub points_balance: i64,
    pub can_checkin: bool,
}

impl From<CheckinOutcome> for CheckinResponse {
    fn from(outcome: CheckinOutcome) -> Self {
        Self {
            current_streak: outcome.current_streak,
            last_checkin: outcome.last_checkin,
            total_checkins: outcome.total_checkins,
            points_earned: outcome.points_earned,
            points_balance: outcome.points_balance,
            can_checkin: false,
        }
    }
}

// ============ Content DTOs ============

/// Content submission request
#[derive(Debug, Deserialize)]
pub struct SubmitContentRequest {
    pub category: Option<String>,
    pub content_type: Option<String>,
    pub content_text: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: Option<String>,
    pub author: Option<String>,
}

/// Vote request
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: Option<String>,
}

/// Report request
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub reason: Option<String>,
}

/// Content item response, decorated for the caller where authenticated
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: String,
    pub category: String,
    pub content_type: String,
    pub content_text: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: Option<String>,
    pub author: Option<String>,
    pub submitted_by: Option<String>,
    pub submitter_username: Option<String>,
    pub status: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub report_count: i64,
    pub user_vote: Option<String>,
    pub is_unlocked: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentResponse {
    fn build(
        content: ContentEntity,
        submitter_username: Option<String>,
        user_vote: Option<String>,
        is_unlocked: bool,
    ) -> Self {
        Self {
            id: content.content_id,
            category: content.category,
            content_type: content.content_type,
            content_text: content.content_text,
            question: content.question,
            answer: content.answer,
            option_a: content.option_a,
            option_b: content.option_b,
            option_c: content.option_c,
            option_d: content.option_d,
            correct_option: content.correct_option,
            author: content.author,
            submitted_by: content.submitted_by,
            submitter_username,
            status: content.status,
            upvotes: content.upvotes,
            downvotes: content.downvotes,
            report_count: content.report_count,
            user_vote,
            is_unlocked,
            created_at: content.created_at.0,
        }
    }
}

impl From<HydratedContent> for ContentResponse {
    fn from(hydrated: HydratedContent) -> Self {
        Self::build(
            hydrated.content,
            hydrated.submitter_username,
            hydrated.user_vote,
            hydrated.is_unlocked,
        )
    }
}

impl From<ContentEntity> for ContentResponse {
    fn from(content: ContentEntity) -> Self {
        Self::build(content, None, None, false)
    }
}

/// One slot of the caller's daily content set
#[derive(Debug, Serialize)]
pub struct DailyItemResponse {
    pub id: String,
    pub content_id: String,
    pub category: String,
    pub position_in_day: i64,
    pub is_unlocked: bool,
    pub content: ContentResponse,
}

impl From<DailyItem> for DailyItemResponse {
    fn from(item: DailyItem) -> Self {
        let is_unlocked = item.content.is_unlocked;
        Self {
            id: item.assignment.assignment_id,
            content_id: item.assignment.content_id,
            category: item.assignment.category,
            position_in_day: item.assignment.position_in_day,
            is_unlocked,
            content: item.content.into(),
        }
    }
}

/// Unlock result
#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub message: String,
    pub points_spent: i64,
    pub remaining_balance: i64,
}

// ============ Saved item DTOs ============

/// Saved item joined with its content payload
#[derive(Debug, Serialize)]
pub struct SavedItemResponse {
    pub content_id: String,
    pub saved_at: DateTime<Utc>,
    pub category: String,
    pub content_type: String,
    pub content_text: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: Option<String>,
    pub author: Option<String>,
}

impl From<SavedItemDetail> for SavedItemResponse {
    fn from(detail: SavedItemDetail) -> Self {
        Self {
            content_id: detail.content.content_id,
            saved_at: detail.saved.saved_at.0,
            category: detail.content.category,
            content_type: detail.content.content_type,
            content_text: detail.content.content_text,
            question: detail.content.question,
            answer: detail.content.answer,
            option_a: detail.content.option_a,
            option_b: detail.content.option_b,
            option_c: detail.content.option_c,
            option_d: detail.content.option_d,
            correct_option: detail.content.correct_option,
            author: detail.content.author,
        }
    }
}

// ============ User DTOs ============

/// Points ledger entry
#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub id: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<LedgerEntryEntity> for LedgerEntryResponse {
    fn from(entry: LedgerEntryEntity) -> Self {
        Self {
            id: entry.entry_id,
            amount: entry.amount,
            entry_type: entry.entry_type,
            description: entry.description,
            created_at: entry.created_at.0,
        }
    }
}

/// Points history page
#[derive(Debug, Serialize)]
pub struct PointsHistoryResponse {
    pub transactions: Vec<LedgerEntryResponse>,
    pub pagination: Pagination,
}

/// Pagination envelope for the points history
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// Per-user statistics
#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub points_balance: i64,
    pub current_streak: i64,
    pub total_checkins: i64,
    pub total_points_earned: i64,
    pub total_content_submitted: i64,
    pub total_saved: i64,
    pub member_since: DateTime<Utc>,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            points_balance: stats.points_balance,
            current_streak: stats.current_streak,
            total_checkins: stats.total_checkins,
            total_points_earned: stats.total_points_earned,
            total_content_submitted: stats.total_content_submitted,
            total_saved: stats.total_saved,
            member_since: stats.member_since,
        }
    }
}

// ============ Admin DTOs ============

/// Report entry attached to a reported item
#[derive(Debug, Serialize)]
pub struct ReportEntryResponse {
    pub user_id: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Reported content item with its report rows
#[derive(Debug, Serialize)]
pub struct ReportedContentResponse {
    #[serde(flatten)]
    pub content: ContentResponse,
    pub reports: Vec<ReportEntryResponse>,
}

impl From<ReportedContent> for ReportedContentResponse {
    fn from(reported: ReportedContent) -> Self {
        let reports = reported
            .reports
            .into_iter()
            .map(|r| ReportEntryResponse {
                user_id: r.user_id,
                reason: r.reason,
                created_at: r.created_at.0,
            })
            .collect();
        let mut content: ContentResponse = reported.content.into();
        content.submitter_username = reported.submitter_username;
        Self { content, reports }
    }
}

/// Platform-wide counters
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub total_content: i64,
    pub total_reports: i64,
    pub active_content: i64,
}

impl From<AdminStats> for AdminStatsResponse {
    fn from(stats: AdminStats) -> Self {
        Self {
            total_users: stats.total_users,
            total_content: stats.total_content,
            total_reports: stats.total_reports,
            active_content: stats.active_content,
        }
    }
}

// ============ Shared envelopes ============

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            (total + i64::from(limit) - 1) / i64::from(limit)
        };
        Self {
            data,
            total,
            page,
            total_pages,
        }
    }
}

/// Query parameters for list endpoints
#[derive(Debug, Deserialize, Default)]
pub struct ListQueryParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub sort: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Query parameters for the saved-items listing
#[derive(Debug, Deserialize, Default)]
pub struct SavedQueryParams {
    pub category: Option<String>,
}

/// Simple acknowledgement body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
