//! # Repository Capability
//!
//! The storage contract every backend implements. The HTTP layer and the
//! service facade only ever see `dyn SubscriptionRepository`, so a backend
//! can be swapped without touching either.
//!
//! ```text
//! SubscriptionService ──► dyn SubscriptionRepository
//!                               ├── PgSubscriptionRepository     (subscriptions-db)
//!                               └── MemorySubscriptionRepository (subscriptions-db)
//! ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::SubscriptionResult;
use crate::types::{Subscription, SubscriptionUpdate, SumFilter};

/// Durable CRUD and aggregation over subscriptions.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Fetches one subscription. Zero rows is `SubscriptionNotFound`.
    async fn get_by_id(&self, id: Uuid) -> SubscriptionResult<Subscription>;

    /// Fetches every subscription of a user. Zero rows is `UserNotFound`.
    async fn get_list_by_user_id(&self, user_id: Uuid) -> SubscriptionResult<Vec<Subscription>>;

    /// Sums `price` over a user's subscriptions matching `filter`.
    /// No matching rows is `UserNotFound`.
    async fn get_price_sum_by_user_id(
        &self,
        user_id: Uuid,
        filter: &SumFilter,
    ) -> SubscriptionResult<i64>;

    /// Inserts a new subscription with its caller-supplied id.
    async fn create(&self, subscription: &Subscription) -> SubscriptionResult<()>;

    /// Applies a partial update. An empty update is `NoUpdateParameters`
    /// and never reaches the store; zero affected rows is `SubscriptionNotFound`.
    async fn update_by_id(&self, id: Uuid, update: SubscriptionUpdate) -> SubscriptionResult<()>;

    /// Physically deletes a subscription. Zero affected rows is `SubscriptionNotFound`.
    async fn delete_by_id(&self, id: Uuid) -> SubscriptionResult<()>;
}
