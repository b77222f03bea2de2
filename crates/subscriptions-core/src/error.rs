//! # Error Types
//!
//! The fixed error vocabulary shared by every layer of the service.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Propagation                               │
//! │                                                                         │
//! │  sqlx::Error ──► SubscriptionError::Store (source kept as-is)          │
//! │                                                                         │
//! │  0 rows / 0 affected ──► SubscriptionNotFound | UserNotFound           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SubscriptionService (forwards, never interprets)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (HTTP layer) ──► 400 "bad request" | 500 "internal ..."      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The HTTP layer is the only place where a variant turns into a status code.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed lower-level failure carried by [`SubscriptionError::Store`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced by subscription operations.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// No subscription exists with the requested id.
    ///
    /// ## When This Occurs
    /// - Fetch by id returns no row
    /// - Update or delete affects zero rows
    #[error("subscription was not found")]
    SubscriptionNotFound,

    /// No subscription rows exist for the requested user.
    ///
    /// An empty list and a missing user are indistinguishable at the
    /// storage layer, so both surface as this variant.
    #[error("user was not found")]
    UserNotFound,

    /// Identifier could not be parsed as a UUID.
    #[error("id is not valid")]
    InvalidId,

    /// Partial update called with neither price nor end date.
    ///
    /// Reported as a server error: the update route treats an empty change
    /// set as a failed operation rather than a malformed request.
    #[error("no update parameters were chosen")]
    NoUpdateParameters,

    /// Price is negative.
    #[error("price is not valid")]
    InvalidPrice,

    /// Date is not "MM-YYYY", or the end date precedes the start date.
    #[error("date is not valid")]
    InvalidDate,

    /// Unclassified failure from the store or its transport.
    #[error("store failure: {0}")]
    Store(#[source] BoxError),
}

impl SubscriptionError {
    /// Wraps a lower-level failure without interpreting it.
    ///
    /// ## Example
    /// ```rust,ignore
    /// sqlx::query(..).execute(&pool).await.map_err(SubscriptionError::store)?;
    /// ```
    pub fn store(err: impl Into<BoxError>) -> Self {
        SubscriptionError::Store(err.into())
    }

    /// Returns true for the conditions the HTTP layer reports as a client error.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            SubscriptionError::Store(_) | SubscriptionError::NoUpdateParameters
        )
    }
}

/// Convenience type alias for subscription results.
pub type SubscriptionResult<T> = Result<T, SubscriptionError>;
