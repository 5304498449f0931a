//! Storage layer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Query error: {0}")]
    Query(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("Not enough points: {required} required, {balance} available")]
    InsufficientPoints { required: i64, balance: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Classify a raw database error. Unique-index violations and
    /// duplicate record-id creations surface as [`StoreError::AlreadyExists`]
    /// so callers can treat idempotent re-inserts as such.
    pub fn from_db(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already exists") || message.contains("already contains") {
            StoreError::AlreadyExists(message)
        } else {
            StoreError::Query(message)
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
