//! SurrealDB schema definitions
//!
//! The unique indexes here are load-bearing: the per-user vote, report,
//! saved-item and unlock ledgers, and the per-day content assignments all
//! rely on them to stay single-rowed under concurrent writers.

/// Complete MoodLift schema
pub const MOODLIFT_SCHEMA: &str = r#"
-- ============================================
-- User accounts
-- ============================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD user_id ON user TYPE string;
DEFINE FIELD email ON user TYPE string;
DEFINE FIELD username ON user TYPE string;
DEFINE FIELD password_hash ON user TYPE string;
DEFINE FIELD points_balance ON user TYPE int;
DEFINE FIELD total_points_earned ON user TYPE int;
DEFINE FIELD current_streak ON user TYPE int;
DEFINE FIELD last_checkin ON user TYPE option<datetime>;
DEFINE FIELD total_checkins ON user TYPE int;
DEFINE FIELD notification_time ON user TYPE option<string>;
DEFINE FIELD notifications_enabled ON user TYPE bool;
DEFINE FIELD is_admin ON user TYPE bool;
DEFINE FIELD created_at ON user TYPE datetime;
DEFINE INDEX idx_user_id ON user FIELDS user_id UNIQUE;
DEFINE INDEX idx_user_email ON user FIELDS email UNIQUE;
DEFINE INDEX idx_user_username ON user FIELDS username UNIQUE;

-- ============================================
-- Content items (soft-deleted via status)
-- ============================================
DEFINE TABLE content SCHEMAFULL;
DEFINE FIELD content_id ON content TYPE string;
DEFINE FIELD category ON content TYPE string;
DEFINE FIELD content_type ON content TYPE string;
DEFINE FIELD content_text ON content TYPE option<string>;
DEFINE FIELD question ON content TYPE option<string>;
DEFINE FIELD answer ON content TYPE option<string>;
DEFINE FIELD option_a ON content TYPE option<string>;
DEFINE FIELD option_b ON content TYPE option<string>;
DEFINE FIELD option_c ON content TYPE option<string>;
DEFINE FIELD option_d ON content TYPE option<string>;
DEFINE FIELD correct_option ON content TYPE option<string>;
DEFINE FIELD author ON content TYPE option<string>;
DEFINE FIELD submitted_by ON content TYPE option<string>;
DEFINE FIELD status ON content TYPE string ASSERT $value IN ['active', 'deleted'];
DEFINE FIELD upvotes ON content TYPE int;
DEFINE FIELD downvotes ON content TYPE int;
DEFINE FIELD report_count ON content TYPE int;
DEFINE FIELD created_at ON content TYPE datetime;
DEFINE INDEX idx_content_id ON content FIELDS content_id UNIQUE;
DEFINE INDEX idx_content_category ON content FIELDS category;
DEFINE INDEX idx_content_submitter ON content FIELDS submitted_by;

-- ============================================
-- Points ledger (append-only)
-- ============================================
DEFINE TABLE points_ledger SCHEMAFULL;
DEFINE FIELD entry_id ON points_ledger TYPE string;
DEFINE FIELD user_id ON points_ledger TYPE string;
DEFINE FIELD amount ON points_ledger TYPE int;
DEFINE FIELD entry_type ON points_ledger TYPE string ASSERT $value IN ['earned', 'spent'];
DEFINE FIELD description ON points_ledger TYPE string;
DEFINE FIELD created_at ON points_ledger TYPE datetime;
DEFINE INDEX idx_ledger_entry ON points_ledger FIELDS entry_id UNIQUE;
DEFINE INDEX idx_ledger_user ON points_ledger FIELDS user_id;

-- ============================================
-- Content votes (one row per user per content)
-- ============================================
DEFINE TABLE content_vote SCHEMAFULL;
DEFINE FIELD user_id ON content_vote TYPE string;
DEFINE FIELD content_id ON content_vote TYPE string;
DEFINE FIELD vote_type ON content_vote TYPE string ASSERT $value IN ['up', 'down'];
DEFINE FIELD created_at ON content_vote TYPE datetime;
DEFINE INDEX idx_vote_user_content ON content_vote FIELDS user_id, content_id UNIQUE;
DEFINE INDEX idx_vote_content ON content_vote FIELDS content_id;

-- ============================================
-- Content reports (first report per user counts)
-- ============================================
DEFINE TABLE content_report SCHEMAFULL;
DEFINE FIELD user_id ON content_report TYPE string;
DEFINE FIELD content_id ON content_report TYPE string;
DEFINE FIELD reason ON content_report TYPE string;
DEFINE FIELD created_at ON content_report TYPE datetime;
DEFINE INDEX idx_report_user_content ON content_report FIELDS user_id, content_id UNIQUE;
DEFINE INDEX idx_report_content ON content_report FIELDS content_id;

-- ============================================
-- Saved items
-- ============================================
DEFINE TABLE saved_item SCHEMAFULL;
DEFINE FIELD user_id ON saved_item TYPE string;
DEFINE FIELD content_id ON saved_item TYPE string;
DEFINE FIELD saved_at ON saved_item TYPE datetime;
DEFINE INDEX idx_saved_user_content ON saved_item FIELDS user_id, content_id UNIQUE;

-- ============================================
-- Content unlocks (permanent grants)
-- ============================================
DEFINE TABLE content_unlock SCHEMAFULL;
DEFINE FIELD user_id ON content_unlock TYPE string;
DEFINE FIELD content_id ON content_unlock TYPE string;
DEFINE FIELD created_at ON content_unlock TYPE datetime;
DEFINE INDEX idx_unlock_user_content ON content_unlock FIELDS user_id, content_id UNIQUE;
DEFINE INDEX idx_unlock_user ON content_unlock FIELDS user_id;

-- ============================================
-- Daily content assignments (immutable per day)
-- ============================================
DEFINE TABLE daily_assignment SCHEMAFULL;
DEFINE FIELD assignment_id ON daily_assignment TYPE string;
DEFINE FIELD user_id ON daily_assignment TYPE string;
DEFINE FIELD category ON daily_assignment TYPE string;
DEFINE FIELD content_id ON daily_assignment TYPE string;
DEFINE FIELD position_in_day ON daily_assignment TYPE int;
DEFINE FIELD assignment_date ON daily_assignment TYPE string;
DEFINE INDEX idx_assignment_slot ON daily_assignment FIELDS user_id, category, assignment_date, position_in_day UNIQUE;
DEFINE INDEX idx_assignment_day ON daily_assignment FIELDS user_id, category, assignment_date;

-- ============================================
-- Historical view log (consulted by the allocator)
-- ============================================
DEFINE TABLE viewed_content SCHEMAFULL;
DEFINE FIELD user_id ON viewed_content TYPE string;
DEFINE FIELD content_id ON viewed_content TYPE string;
DEFINE FIELD viewed_at ON viewed_content TYPE datetime;
DEFINE INDEX idx_viewed_user_content ON viewed_content FIELDS user_id, content_id UNIQUE;
"#;
