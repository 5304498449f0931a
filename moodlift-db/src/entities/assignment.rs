//! Daily content assignment entities

use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

/// One slot of a user's daily content set for a category. The set for a
/// given (user, category, date) is created once and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEntity {
    pub assignment_id: String,
    pub user_id: String,
    pub category: String,
    pub content_id: String,
    pub position_in_day: i64,
    /// Calendar date in `YYYY-MM-DD` form (UTC)
    pub assignment_date: String,
}

/// Historical view-log row; excludes content from future daily sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewedContentEntity {
    pub user_id: String,
    pub content_id: String,
    pub viewed_at: Datetime,
}
