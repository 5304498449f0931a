//! Domain services
//!
//! One service per domain area. Each holds a shared [`Datastore`] handle
//! and issues parameterized SurrealQL; multi-step writes run as single
//! transactions so a mid-sequence failure can never leave partial state.
//!
//! [`Datastore`]: crate::datastore::Datastore

pub mod account_service;
pub mod admin_service;
pub mod checkin_service;
pub mod content_service;
pub mod daily_service;
pub mod engagement_service;
pub mod hydration;

pub use account_service::{AccountService, UserStats};
pub use admin_service::{AdminService, AdminStats, ReportedContent};
pub use checkin_service::{CheckinInfo, CheckinOutcome, CheckinService};
pub use content_service::ContentService;
pub use daily_service::{DailyItem, DailyService};
pub use engagement_service::{EngagementService, SavedItemDetail, UnlockOutcome};
pub use hydration::HydratedContent;
