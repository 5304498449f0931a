//! Content item entity

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

/// Content item row. Quiz items carry the question/option fields, plain
/// text items only `content_text`. Items are never physically removed;
/// moderation flips `status` to `deleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    pub content_id: String,
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
    /// Owning user; absent for system-seeded items
    pub submitted_by: Option<String>,
    pub status: String,
    /// Cached recount of the vote ledger
    pub upvotes: i64,
    pub downvotes: i64,
    /// Cached recount of the report ledger
    pub report_count: i64,
    pub created_at: Datetime,
}

impl ContentEntity {
    pub const STATUS_ACTIVE: &'static str = "active";
}

/// Fields accepted from a content submission
#[derive(Debug, Clone, Default)]
pub struct NewContent {
    pub category: String,
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

impl NewContent {
    /// Materialize a submission into an active content row
    pub fn into_entity(self, content_id: String, submitted_by: Option<String>) -> ContentEntity {
        ContentEntity {
            content_id,
            category: self.category,
            content_type: self.content_type.unwrap_or_else(|| "text".to_string()),
            content_text: self.content_text,
            question: self.question,
            answer: self.answer,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            correct_option: self.correct_option,
            author: self.author,
            submitted_by,
            status: ContentEntity::STATUS_ACTIVE.to_string(),
            upvotes: 0,
            downvotes: 0,
            report_count: 0,
            created_at: Datetime::from(Utc::now()),
        }
    }
}
