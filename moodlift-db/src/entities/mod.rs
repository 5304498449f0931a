//! Storage entities

pub mod assignment;
pub mod content;
pub mod engagement;
pub mod ledger;
pub mod user;

pub use assignment::{AssignmentEntity, ViewedContentEntity};
pub use content::{ContentEntity, NewContent};
pub use engagement::{ReportEntity, SavedItemEntity, UnlockEntity, VoteEntity};
pub use ledger::LedgerEntryEntity;
pub use user::UserEntity;
