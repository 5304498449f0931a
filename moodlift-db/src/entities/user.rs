//! User account entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntity {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    /// Spendable balance; every mutation pairs with a ledger insert
    pub points_balance: i64,
    /// Lifetime earned points, monotonic
    pub total_points_earned: i64,
    pub current_streak: i64,
    pub last_checkin: Option<Datetime>,
    pub total_checkins: i64,
    pub notification_time: Option<String>,
    pub notifications_enabled: bool,
    pub is_admin: bool,
    pub created_at: Datetime,
}

impl UserEntity {
    /// Points credited to every new account at registration
    pub const SIGNUP_BONUS: i64 = 5;

    /// Create a new account with the signup bonus applied
    pub fn new(user_id: String, email: String, username: String, password_hash: String) -> Self {
        Self {
            user_id,
            email,
            username,
            password_hash,
            points_balance: Self::SIGNUP_BONUS,
            total_points_earned: Self::SIGNUP_BONUS,
            current_streak: 0,
            last_checkin: None,
            total_checkins: 0,
            notification_time: None,
            notifications_enabled: true,
            is_admin: false,
            created_at: Datetime::from(Utc::now()),
        }
    }

    /// Last check-in as a chrono timestamp
    pub fn last_checkin_time(&self) -> Option<DateTime<Utc>> {
        self.last_checkin.as_ref().map(|d| d.0)
    }
}
