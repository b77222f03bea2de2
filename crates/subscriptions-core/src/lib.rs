//! # subscriptions-core: Domain Types for the Subscriptions Service
//!
//! Pure domain code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Subscriptions Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               apps/api (axum handlers + facade)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ subscriptions-core (THIS CRATE) ★                 │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   types   │  │   month   │  │   error   │  │ repository │  │   │
//! │  │   │Subscription│ │ MonthDate │  │Subscription│ │   trait    │  │   │
//! │  │   │ SumFilter │  │ "MM-YYYY" │  │   Error   │  │            │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              subscriptions-db (PostgreSQL adapter)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `Subscription`, sum filters, partial updates
//! - [`month`] - month-granularity dates in `"MM-YYYY"` format
//! - [`error`] - the shared error vocabulary
//! - [`validation`] - boundary checks
//! - [`repository`] - the storage capability trait

pub mod error;
pub mod month;
pub mod repository;
pub mod types;
pub mod validation;

pub use error::{SubscriptionError, SubscriptionResult};
pub use month::MonthDate;
pub use repository::SubscriptionRepository;
pub use types::{Subscription, SubscriptionUpdate, SumFilter};
