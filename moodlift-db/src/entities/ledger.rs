//! Points ledger entity

use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

/// Append-only record of a points change. `amount` is positive for
/// earnings and negative for spends; the user's denormalized balance is
/// only ever mutated together with one of these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryEntity {
    pub entry_id: String,
    pub user_id: String,
    pub amount: i64,
    pub entry_type: String,
    pub description: String,
    pub created_at: Datetime,
}
