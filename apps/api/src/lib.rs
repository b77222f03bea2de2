//! # Subscriptions API
//!
//! HTTP service for recording users' recurring service subscriptions and
//! totalling what they pay.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Subscriptions API                                │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  server        │  │  routes        │  │  service                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • Router       │─►│ • decode       │─►│ • SubscriptionService      ││
//! │  │ • CORS, trace  │  │ • validate     │  │ • pass-through facade      ││
//! │  │ • shutdown     │  │ • sanitize     │  │                            ││
//! │  └────────────────┘  └────────────────┘  └─────────────┬──────────────┘│
//! │                                                        │               │
//! │                                      ┌─────────────────▼─────────────┐ │
//! │                                      │ SubscriptionRepository        │ │
//! │                                      │ (PostgreSQL or in-memory)     │ │
//! │                                      └───────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]: `configs/config.toml` plus `SUBSCRIPTIONS__*` overrides.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod routes;
pub mod sanitize;
pub mod server;
pub mod service;
pub mod telemetry;

// Re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use service::{SubscriptionService, Subscriptions};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: Arc<dyn SubscriptionService>,
}

impl AppState {
    pub fn new(subscriptions: Arc<dyn SubscriptionService>) -> Self {
        AppState { subscriptions }
    }
}
