//! Daily check-in service
//!
//! The preview and the commit share the streak arithmetic in
//! [`crate::streak`]. The commit runs as a single transaction whose guard
//! re-checks "not yet checked in today" inside the store, so concurrent
//! attempts for the same user can never both succeed.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use surrealdb::sql::Datetime;

use crate::datastore::Datastore;
use crate::entities::UserEntity;
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;
use crate::streak;

/// Read-only check-in preview
#[derive(Debug, Clone)]
pub struct CheckinInfo {
    pub current_streak: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub total_checkins: i64,
    pub can_checkin: bool,
    /// Points the next commit would award
    pub next_points: i64,
}

/// Post-commit check-in snapshot
#[derive(Debug, Clone)]
pub struct CheckinOutcome {
    pub current_streak: i64,
    pub last_checkin: Option<DateTime<Utc>>,
    pub total_checkins: i64,
    pub points_earned: i64,
    pub points_balance: i64,
}

const CHECKIN_TXN: &str = "\
BEGIN TRANSACTION; \
LET $rows = (UPDATE user SET \
        points_balance += $points, \
        total_points_earned += $points, \
        current_streak = $new_streak, \
        last_checkin = $now, \
        total_checkins += 1 \
    WHERE user_id = $user_id \
      AND (last_checkin == NONE OR last_checkin < $day_start) \
    RETURN AFTER); \
IF array::len($rows) == 0 { THROW 'ALREADY_CHECKED_IN' }; \
CREATE points_ledger CONTENT { \
    entry_id: $entry_id, \
    user_id: $user_id, \
    amount: $points, \
    entry_type: 'earned', \
    description: $description, \
    created_at: $now \
}; \
COMMIT TRANSACTION;";

pub struct CheckinService {
    datastore: Arc<Datastore>,
    ids: IdGenerator,
}

impl CheckinService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            datastore,
            ids: IdGenerator::new(),
        }
    }

    async fn get_user(&self, user_id: &str) -> StoreResult<UserEntity> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM user WHERE user_id = $user_id LIMIT 1")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let user: Option<UserEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        user.ok_or_else(|| StoreError::NotFound(format!("User {user_id} not found")))
    }

    /// Preview the streak state without mutating anything
    pub async fn info(&self, user_id: &str) -> StoreResult<CheckinInfo> {
        let user = self.get_user(user_id).await?;
        let today = Utc::now().date_naive();

        let last = user.last_checkin_time();
        let can_checkin = streak::can_checkin(last, today);
        let next = streak::next_streak(last, user.current_streak, today);

        Ok(CheckinInfo {
            current_streak: user.current_streak,
            last_checkin: last,
            total_checkins: user.total_checkins,
            can_checkin,
            next_points: streak::points_for_streak(next),
        })
    }

    /// Commit today's check-in: advance the streak, credit the award, and
    /// append the paired ledger entry, atomically.
    pub async fn checkin(&self, user_id: &str) -> StoreResult<CheckinOutcome> {
        let user = self.get_user(user_id).await?;
        let now = Utc::now();
        let today = now.date_naive();

        let last = user.last_checkin_time();
        if !streak::can_checkin(last, today) {
            return Err(StoreError::AlreadyCheckedIn);
        }

        let new_streak = streak::next_streak(last, user.current_streak, today);
        let points_earned = streak::points_for_streak(new_streak);
        let day_start = today.and_time(NaiveTime::MIN).and_utc();

        let response = self
            .datastore
            .client()
            .query(CHECKIN_TXN)
            .bind(("user_id", user_id.to_string()))
            .bind(("points", points_earned))
            .bind(("new_streak", new_streak))
            .bind(("now", Datetime::from(now)))
            .bind(("day_start", Datetime::from(day_start)))
            .bind(("entry_id", self.ids.next("ledger")))
            .bind(("description", format!("Daily check-in day {new_streak}")))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if let Err(e) = response.check() {
            let message = e.to_string();
            if message.contains("ALREADY_CHECKED_IN") {
                return Err(StoreError::AlreadyCheckedIn);
            }
            return Err(StoreError::Query(message));
        }

        tracing::debug!("Check-in committed for {user_id}: day {new_streak}, +{points_earned} points");

        let updated = self.get_user(user_id).await?;
        Ok(CheckinOutcome {
            current_streak: updated.current_streak,
            last_checkin: updated.last_checkin_time(),
            total_checkins: updated.total_checkins,
            points_earned,
            points_balance: updated.points_balance,
        })
    }
}
