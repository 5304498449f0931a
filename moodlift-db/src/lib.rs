//! MoodLift Storage Layer
//!
//! SurrealDB-backed persistence and the business core of the MoodLift
//! backend: streak and points arithmetic, the daily content allocator, and
//! the engagement ledgers (votes, reports, saved items, unlocks).
//!
//! The datastore handle is opened once at startup, schema-initialized, and
//! injected into each service. All cross-request consistency (check-in
//! races, unlock races, assignment creation races) is pushed down into
//! SurrealDB transactions and unique indexes; the services hold no shared
//! mutable state of their own.

pub mod datastore;
pub mod entities;
pub mod error;
pub mod ids;
pub mod schema;
pub mod services;
pub mod streak;

// Re-export main types
pub use datastore::{Datastore, DatastoreConfig};
pub use entities::*;
pub use error::{StoreError, StoreResult};
pub use schema::MOODLIFT_SCHEMA;
pub use services::{
    AccountService, AdminService, AdminStats, CheckinInfo, CheckinOutcome, CheckinService,
    ContentService, DailyItem, DailyService, EngagementService, HydratedContent, ReportedContent,
    SavedItemDetail, UnlockOutcome, UserStats,
};
