//! Subscription operations facade.
//!
//! Sits between the HTTP handlers and storage so either side can be replaced
//! on its own. Every call is forwarded unchanged, results and errors included.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use subscriptions_core::{
    Subscription, SubscriptionRepository, SubscriptionResult, SubscriptionUpdate, SumFilter,
};

/// Operations the HTTP layer can invoke.
#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> SubscriptionResult<Subscription>;

    async fn get_list_by_user_id(&self, user_id: Uuid) -> SubscriptionResult<Vec<Subscription>>;

    async fn get_price_sum_by_user_id(
        &self,
        user_id: Uuid,
        filter: &SumFilter,
    ) -> SubscriptionResult<i64>;

    async fn create(&self, subscription: &Subscription) -> SubscriptionResult<()>;

    async fn update_by_id(&self, id: Uuid, update: SubscriptionUpdate) -> SubscriptionResult<()>;

    async fn delete_by_id(&self, id: Uuid) -> SubscriptionResult<()>;
}

/// Pass-through implementation over any repository.
#[derive(Clone)]
pub struct Subscriptions {
    repository: Arc<dyn SubscriptionRepository>,
}

impl Subscriptions {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Subscriptions { repository }
    }
}

#[async_trait]
impl SubscriptionService for Subscriptions {
    async fn get_by_id(&self, id: Uuid) -> SubscriptionResult<Subscription> {
        self.repository.get_by_id(id).await
    }

    async fn get_list_by_user_id(&self, user_id: Uuid) -> SubscriptionResult<Vec<Subscription>> {
        self.repository.get_list_by_user_id(user_id).await
    }

    async fn get_price_sum_by_user_id(
        &self,
        user_id: Uuid,
        filter: &SumFilter,
    ) -> SubscriptionResult<i64> {
        self.repository.get_price_sum_by_user_id(user_id, filter).await
    }

    async fn create(&self, subscription: &Subscription) -> SubscriptionResult<()> {
        self.repository.create(subscription).await
    }

    async fn update_by_id(&self, id: Uuid, update: SubscriptionUpdate) -> SubscriptionResult<()> {
        self.repository.update_by_id(id, update).await
    }

    async fn delete_by_id(&self, id: Uuid) -> SubscriptionResult<()> {
        self.repository.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subscriptions_core::{MonthDate, SubscriptionError};
    use subscriptions_db::MemorySubscriptionRepository;

    #[tokio::test]
    async fn test_forwards_results_and_errors() {
        let service = Subscriptions::new(Arc::new(MemorySubscriptionRepository::new()));
        let sub = Subscription {
            id: Uuid::new_v4(),
            service_name: "Netflix".to_string(),
            price: 100,
            user_id: Uuid::new_v4(),
            start_date: MonthDate::new(2024, 1).unwrap(),
            end_date: None,
        };

        service.create(&sub).await.unwrap();
        assert_eq!(service.get_by_id(sub.id).await.unwrap(), sub);
        assert_eq!(
            service.get_price_sum_by_user_id(sub.user_id, &SumFilter::default()).await.unwrap(),
            100
        );
        assert!(matches!(
            service.update_by_id(sub.id, SubscriptionUpdate::default()).await,
            Err(SubscriptionError::NoUpdateParameters)
        ));
        service.delete_by_id(sub.id).await.unwrap();
        assert!(matches!(
            service.get_list_by_user_id(sub.user_id).await,
            Err(SubscriptionError::UserNotFound)
        ));
    }
}
