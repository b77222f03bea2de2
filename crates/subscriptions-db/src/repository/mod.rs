//! # Repository Module
//!
//! Implementations of [`SubscriptionRepository`](subscriptions_core::SubscriptionRepository).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SubscriptionService                                                   │
//! │       │  repo.get_price_sum_by_user_id(user, &filter)                  │
//! │       ▼                                                                 │
//! │  dyn SubscriptionRepository                                            │
//! │       ├── PgSubscriptionRepository      SQL via query.rs               │
//! │       └── MemorySubscriptionRepository  HashMap behind RwLock          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod postgres;
