//! Engagement service: votes, reports, saved items, and unlocks
//!
//! Votes and reports recompute the content item's cached counters as
//! exact recounts of their ledgers inside the writing transaction, never
//! as incremental deltas. Unlocks recompute the cost and re-check the
//! balance inside the transaction so concurrent attempts cannot overdraft
//! or double-charge.

use std::sync::Arc;

use chrono::Utc;
use surrealdb::sql::Datetime;

use crate::datastore::Datastore;
use crate::entities::engagement::pair_key;
use crate::entities::{ContentEntity, LedgerEntryEntity, SavedItemEntity, UnlockEntity, VoteEntity};
use crate::error::{StoreError, StoreResult};
use crate::ids::IdGenerator;
use crate::services::hydration::{hydrate_one, HydratedContent};

/// First unlock is discounted; every later one costs the full price
const FIRST_UNLOCK_COST: i64 = 5;
const UNLOCK_COST: i64 = 15;

/// Result of a successful unlock
#[derive(Debug, Clone)]
pub struct UnlockOutcome {
    pub points_spent: i64,
    pub remaining_balance: i64,
}

/// A saved item joined with its content row
#[derive(Debug, Clone)]
pub struct SavedItemDetail {
    pub saved: SavedItemEntity,
    pub content: ContentEntity,
}

const VOTE_TXN: &str = "\
BEGIN TRANSACTION; \
UPSERT type::thing('content_vote', $vote_key) CONTENT { \
    user_id: $user_id, \
    content_id: $content_id, \
    vote_type: $vote_type, \
    created_at: $now \
}; \
LET $up = array::len((SELECT * FROM content_vote WHERE content_id = $content_id AND vote_type = 'up')); \
LET $down = array::len((SELECT * FROM content_vote WHERE content_id = $content_id AND vote_type = 'down')); \
UPDATE content SET upvotes = $up, downvotes = $down WHERE content_id = $content_id; \
COMMIT TRANSACTION;";

const REPORT_TXN: &str = "\
BEGIN TRANSACTION; \
CREATE type::thing('content_report', $report_key) CONTENT { \
    user_id: $user_id, \
    content_id: $content_id, \
    reason: $reason, \
    created_at: $now \
}; \
UPDATE content SET report_count = \
    array::len((SELECT * FROM content_report WHERE content_id = $content_id)) \
    WHERE content_id = $content_id; \
COMMIT TRANSACTION;";

const UNLOCK_TXN: &str = "\
BEGIN TRANSACTION; \
CREATE type::thing('content_unlock', $unlock_key) CONTENT { \
    user_id: $user_id, \
    content_id: $content_id, \
    created_at: $now \
}; \
LET $prior = array::len((SELECT * FROM content_unlock WHERE user_id = $user_id)) - 1; \
LET $cost = IF $prior == 0 { $first_cost } ELSE { $full_cost }; \
LET $rows = (UPDATE user SET points_balance -= $cost \
    WHERE user_id = $user_id AND points_balance >= $cost RETURN AFTER); \
IF array::len($rows) == 0 { THROW 'INSUFFICIENT_POINTS' }; \
CREATE points_ledger CONTENT { \
    entry_id: $entry_id, \
    user_id: $user_id, \
    amount: 0 - $cost, \
    entry_type: 'spent', \
    description: 'Unlocked content', \
    created_at: $now \
}; \
COMMIT TRANSACTION;";

pub struct EngagementService {
    datastore: Arc<Datastore>,
    ids: IdGenerator,
}

impl EngagementService {
    pub fn new(datastore: Arc<Datastore>) -> Self {
        Self {
            datastore,
            ids: IdGenerator::new(),
        }
    }

    async fn get_content(&self, content_id: &str) -> StoreResult<ContentEntity> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content WHERE content_id = $content_id LIMIT 1")
            .bind(("content_id", content_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let content: Option<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        content.ok_or_else(|| StoreError::NotFound(format!("Content {content_id} not found")))
    }

    /// Record or overwrite the user's vote, recount the cached tallies,
    /// and return the freshly hydrated item
    pub async fn vote(
        &self,
        user_id: &str,
        content_id: &str,
        vote_type: &str,
    ) -> StoreResult<HydratedContent> {
        if vote_type != VoteEntity::VOTE_UP && vote_type != VoteEntity::VOTE_DOWN {
            return Err(StoreError::Validation(
                "vote_type must be \"up\" or \"down\"".to_string(),
            ));
        }
        self.get_content(content_id).await?;

        self.datastore
            .client()
            .query(VOTE_TXN)
            .bind(("vote_key", pair_key(user_id, content_id)))
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .bind(("vote_type", vote_type.to_string()))
            .bind(("now", Datetime::from(Utc::now())))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .check()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let content = self.get_content(content_id).await?;
        hydrate_one(&self.datastore, content, Some(user_id)).await
    }

    /// Record a report. A duplicate report by the same user is a silent
    /// no-op; the count never moves twice for one user.
    pub async fn report(&self, user_id: &str, content_id: &str, reason: &str) -> StoreResult<()> {
        if reason.trim().is_empty() {
            return Err(StoreError::Validation("Reason is required".to_string()));
        }
        self.get_content(content_id).await?;

        let response = self
            .datastore
            .client()
            .query(REPORT_TXN)
            .bind(("report_key", pair_key(user_id, content_id)))
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .bind(("reason", reason.to_string()))
            .bind(("now", Datetime::from(Utc::now())))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match response.check().map_err(StoreError::from_db) {
            Ok(_) | Err(StoreError::AlreadyExists(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }

    /// Spend points to permanently unlock a content item
    pub async fn unlock(&self, user_id: &str, content_id: &str) -> StoreResult<UnlockOutcome> {
        self.get_content(content_id).await?;

        // Friendly pre-checks; the transaction below re-validates both
        // conditions under the store's serialization.
        if self.find_unlock(user_id, content_id).await?.is_some() {
            return Err(StoreError::AlreadyExists(
                "Content already unlocked".to_string(),
            ));
        }
        let cost = if self.unlock_count(user_id).await? == 0 {
            FIRST_UNLOCK_COST
        } else {
            UNLOCK_COST
        };
        let balance = self.balance(user_id).await?;
        if balance < cost {
            return Err(StoreError::InsufficientPoints {
                required: cost,
                balance,
            });
        }

        let entry_id = self.ids.next("ledger");
        let response = self
            .datastore
            .client()
            .query(UNLOCK_TXN)
            .bind(("unlock_key", pair_key(user_id, content_id)))
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .bind(("first_cost", FIRST_UNLOCK_COST))
            .bind(("full_cost", UNLOCK_COST))
            .bind(("entry_id", entry_id.clone()))
            .bind(("now", Datetime::from(Utc::now())))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if let Err(e) = response.check() {
            let message = e.to_string();
            if message.contains("INSUFFICIENT_POINTS") {
                let balance = self.balance(user_id).await?;
                return Err(StoreError::InsufficientPoints {
                    required: cost,
                    balance,
                });
            }
            return Err(StoreError::from_db(e));
        }

        // The transaction recomputed the cost; read it back off the
        // ledger entry it wrote.
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM points_ledger WHERE entry_id = $entry_id LIMIT 1")
            .bind(("entry_id", entry_id))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let entry: Option<LedgerEntryEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let spent = entry
            .map(|e| -e.amount)
            .ok_or_else(|| StoreError::Query("Unlock ledger entry not persisted".to_string()))?;

        tracing::info!("User {user_id} unlocked {content_id} for {spent} points");

        Ok(UnlockOutcome {
            points_spent: spent,
            remaining_balance: self.balance(user_id).await?,
        })
    }

    /// Save a content item; duplicates are a no-op
    pub async fn save(&self, user_id: &str, content_id: &str) -> StoreResult<()> {
        self.get_content(content_id).await?;

        let response = self
            .datastore
            .client()
            .query(
                "CREATE type::thing('saved_item', $saved_key) CONTENT { \
                    user_id: $user_id, \
                    content_id: $content_id, \
                    saved_at: $now \
                }",
            )
            .bind(("saved_key", pair_key(user_id, content_id)))
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .bind(("now", Datetime::from(Utc::now())))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match response.check().map_err(StoreError::from_db) {
            Ok(_) | Err(StoreError::AlreadyExists(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }

    /// Remove a saved item; removing an absent one is a no-op
    pub async fn unsave(&self, user_id: &str, content_id: &str) -> StoreResult<()> {
        self.datastore
            .client()
            .query("DELETE saved_item WHERE user_id = $user_id AND content_id = $content_id")
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?
            .check()
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    /// The user's saved items, newest first, optionally restricted to a
    /// category
    pub async fn saved(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> StoreResult<Vec<SavedItemDetail>> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM saved_item WHERE user_id = $user_id ORDER BY saved_at DESC")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let saved_rows: Vec<SavedItemEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if saved_rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = saved_rows.iter().map(|s| s.content_id.clone()).collect();
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content WHERE content_id INSIDE $ids")
            .bind(("ids", ids))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let contents: Vec<ContentEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut by_id: std::collections::HashMap<String, ContentEntity> = contents
            .into_iter()
            .map(|c| (c.content_id.clone(), c))
            .collect();

        Ok(saved_rows
            .into_iter()
            .filter_map(|saved| {
                let content = by_id.remove(&saved.content_id)?;
                if let Some(wanted) = category {
                    if content.category != wanted {
                        return None;
                    }
                }
                Some(SavedItemDetail { saved, content })
            })
            .collect())
    }

    async fn find_unlock(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> StoreResult<Option<UnlockEntity>> {
        let mut response = self
            .datastore
            .client()
            .query(
                "SELECT * FROM content_unlock \
                 WHERE user_id = $user_id AND content_id = $content_id LIMIT 1",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("content_id", content_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn unlock_count(&self, user_id: &str) -> StoreResult<i64> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM content_unlock WHERE user_id = $user_id")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let rows: Vec<UnlockEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(rows.len() as i64)
    }

    async fn balance(&self, user_id: &str) -> StoreResult<i64> {
        let mut response = self
            .datastore
            .client()
            .query("SELECT * FROM user WHERE user_id = $user_id LIMIT 1")
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let user: Option<crate::entities::UserEntity> = response
            .take(0)
            .map_err(|e| StoreError::Query(e.to_string()))?;
        user.map(|u| u.points_balance)
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id} not found")))
    }
}
