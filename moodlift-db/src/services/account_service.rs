//! User account service
//!
//! Registration (with the signup bonus), credential verification, profile
//! reads and updates, password changes, the points history, and per-user
//! statistics.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::datastore::Datastore;
use crate::entities::{LedgerEntryEntity, UserEntity};
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;

/// Per-user statistics for the stats endpoint
#[derive(Debug, Clone)]
pub struct UserStats {
    pub points_balance: i64,
    pub current_streak: i64,
    pub total_checkins: i64,
    pub total_points_earned: i64,
    pub total_content_submitted: i64,
    pub total_saved: i64,
    pub member_since: DateTime<Utc>,
}

#[derive(Deserialize)]
struct CountRow {
    total: i64,
}

pub struct AccountService {
    datastore: Arc<Datastore>,
    ids: IdGenerator,
}

impl AccountService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            datastore,
            ids: IdGenerator::new(),
        }
    }

    /// Register a new account. Fails with `AlreadyExists` when the email
    /// or username is taken; the unique indexes catch races the pre-check
    /// misses.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> StoreResult<UserEntity> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM user WHERE email = $email OR username = $username LIMIT 1")
            .bind(("email", email.to_string()))
            .bind(("username", username.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let existing: Option<UserEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if existing.is_some() {
            return Err(StoreError::AlreadyExists(
                "Email or username already exists".to_string(),
            ));
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| StoreError::Query(format!("Password hashing failed: {e}")))?;
        let user = UserEntity::new(
            self.ids.next("user"),
            email.to_string(),
            username.to_string(),
            password_hash,
        );

        let mut response = self
            .datastore
            .client()
            .query("CREATE user CONTENT $data RETURN AFTER")
            .bind(("data", user.clone()))
            .await
            .map_err(StoreError::from_db)?;
        let created: Option<UserEntity> = response
            .take(0)
            .map_err(StoreError::from_db)?;

        created.ok_or_else(|| StoreError::Query("Failed to create user".to_string()))
    }

    /// Verify an email/password pair. Returns `None` for unknown emails
    /// and wrong passwords alike, so callers cannot distinguish the two.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> StoreResult<Option<UserEntity>> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let user: Option<UserEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let Some(user) = user else {
            return Ok(None);
        };

        let valid = verify(password, &user.password_hash)
            .map_err(|e| StoreError::Query(format!("Password verification failed: {e}")))?;

        Ok(valid.then_some(user))
    }

    /// Fetch a user by id
    pub async fn get_user(&self, user_id: &str) -> StoreResult<Option<UserEntity>> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM user WHERE user_id = $user_id LIMIT 1")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    /// Update profile fields; absent fields keep their current values
    pub async fn update_profile(
        &self,
        user_id: &str,
        username: Option<String>,
        notification_time: Option<String>,
        notifications_enabled: Option<bool>,
    ) -> StoreResult<UserEntity> {
        let mut response = self
            .datastore
            .client()
            .query(
                "UPDATE user SET \
                    username = $username ?? username, \
                    notification_time = $notification_time ?? notification_time, \
                    notifications_enabled = $notifications_enabled ?? notifications_enabled \
                 WHERE user_id = $user_id RETURN AFTER",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("username", username))
            .bind(("notification_time", notification_time))
            .bind(("notifications_enabled", notifications_enabled))
            .await
            .map_err(StoreError::from_db)?;
        let updated: Option<UserEntity> = response
            .take(0)
            .map_err(StoreError::from_db)?;

        updated.ok_or_else(|| StoreError::NotFound(format!("User {user_id} not found")))
    }

    /// Change the account password. Returns `false` when the current
    /// password does not match; no state changes in that case.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> StoreResult<bool> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id} not found")))?;

        let valid = verify(current_password, &user.password_hash)
            .map_err(|e| StoreError::Query(format!("Password verification failed: {e}")))?;
        if !valid {
            return Ok(false);
        }

        let password_hash = hash(new_password, DEFAULT_COST)
            .map_err(|e| StoreError::Query(format!("Password hashing failed: {e}")))?;
        self.datastore
            .client()
            .query("UPDATE user SET password_hash = $password_hash WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .check()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(true)
    }

    /// Page through the user's points ledger, newest first. Returns the
    /// page and the total entry count.
    pub async fn points_history(
        &self,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> StoreResult<(Vec<LedgerEntryEntity>, i64)> {
        let start = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let mut response = self
            .datastore
            .client()
            .query(
                "SELECT * FROM points_ledger WHERE user_id = $user_id \
                 ORDER BY created_at DESC LIMIT $limit START $start",
            )
            .query(
                "SELECT count() AS total FROM points_ledger WHERE user_id = $user_id GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("limit", i64::from(limit)))
            .bind(("start", start))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let entries: Vec<LedgerEntryEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let count: Option<CountRow> = response
            .take(1)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok((entries, count.map(|c| c.total).unwrap_or(0)))
    }

    /// Aggregate statistics for the stats endpoint
    pub async fn stats(&self, user_id: &str) -> StoreResult<UserStats> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id} not found")))?;

        let mut response = self
            .datastore
            .client()
            .query("SELECT count() AS total FROM content WHERE submitted_by = $user_id GROUP ALL")
            .query("SELECT count() AS total FROM saved_item WHERE user_id = $user_id GROUP ALL")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let submitted: Option<CountRow> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let saved: Option<CountRow> = response
            .take(1)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(UserStats {
            points_balance: user.points_balance,
            current_streak: user.current_streak,
            total_checkins: user.total_checkins,
            total_points_earned: user.total_points_earned,
            total_content_submitted: submitted.map(|c| c.total).unwrap_or(0),
            total_saved: saved.map(|c| c.total).unwrap_or(0),
            member_since: user.created_at.0,
        })
    }
}
