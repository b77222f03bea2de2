//! # Database Error Types
//!
//! Infrastructure failures raised while opening and preparing the store.
//! Per-operation failures use [`SubscriptionError`](subscriptions_core::SubscriptionError)
//! instead, so the facade and HTTP layer never see this type.

use std::time::Duration;

use thiserror::Error;

/// Errors from pool setup and schema bootstrap.
#[derive(Debug, Error)]
pub enum DbError {
    /// The configured table name is not a plain SQL identifier.
    ///
    /// ## When This Occurs
    /// - Name contains quotes, spaces, semicolons or other punctuation
    /// - Name starts with a digit
    /// - More than one `.` qualifier
    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),

    /// Could not create the pool or parse the connection options.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The store did not answer the startup ping in time.
    #[error("database unreachable after {0:?}")]
    Unreachable(Duration),

    /// Table or index creation failed.
    #[error("schema setup failed: {0}")]
    SchemaFailed(String),
}

/// Result type for database setup operations.
pub type DbResult<T> = Result<T, DbError>;
