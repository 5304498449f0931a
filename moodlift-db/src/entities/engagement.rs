//! Engagement ledger entities: votes, reports, saved items, unlocks
//!
//! All four tables are keyed by a deterministic `user:content` record id,
//! backed by a unique index on (user_id, content_id). Creating one of
//! these records twice is therefore either an upsert (votes) or a no-op
//! (reports, saved items) by construction.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

/// A user's single vote on a content item; re-voting overwrites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteEntity {
    pub user_id: String,
    pub content_id: String,
    pub vote_type: String,
    pub created_at: Datetime,
}

impl VoteEntity {
    pub const VOTE_UP: &'static str = "up";
    pub const VOTE_DOWN: &'static str = "down";
}

/// A user's report of a content item; first report per user counts once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntity {
    pub user_id: String,
    pub content_id: String,
    pub reason: String,
    pub created_at: Datetime,
}

/// Presence-only favorite marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItemEntity {
    pub user_id: String,
    pub content_id: String,
    pub saved_at: Datetime,
}

/// Permanent grant of access to a point-gated content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockEntity {
    pub user_id: String,
    pub content_id: String,
    pub created_at: Datetime,
}

/// Deterministic record key for the per-user-per-content tables
pub fn pair_key(user_id: &str, content_id: &str) -> String {
    format!("{user_id}:{content_id}")
}
