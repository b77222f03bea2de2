//! # In-Memory Subscription Repository
//!
//! A process-local backend with the same observable behavior as the
//! PostgreSQL repository, including its not-found mapping and SQL NULL
//! comparison rules. Selected with `database.backend = "memory"`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use subscriptions_core::{
    Subscription, SubscriptionError, SubscriptionRepository, SubscriptionResult,
    SubscriptionUpdate, SumFilter,
};

/// Subscriptions keyed by id behind an async lock.
#[derive(Debug, Default)]
pub struct MemorySubscriptionRepository {
    rows: RwLock<HashMap<Uuid, Subscription>>,
}

impl MemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `end_date <= to_date` where a NULL end date never satisfies the comparison.
fn matches_filter(sub: &Subscription, filter: &SumFilter) -> bool {
    if let Some(name) = &filter.service_name {
        if &sub.service_name != name {
            return false;
        }
    }
    if let Some(from) = filter.from_date {
        if sub.start_date < from {
            return false;
        }
    }
    if let Some(to) = filter.to_date {
        match sub.end_date {
            Some(end) if end <= to => {}
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl SubscriptionRepository for MemorySubscriptionRepository {
    async fn get_by_id(&self, id: Uuid) -> SubscriptionResult<Subscription> {
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SubscriptionError::SubscriptionNotFound)
    }

    async fn get_list_by_user_id(&self, user_id: Uuid) -> SubscriptionResult<Vec<Subscription>> {
        let mut list: Vec<Subscription> = self
            .rows
            .read()
            .await
            .values()
            .filter(|sub| sub.user_id == user_id)
            .cloned()
            .collect();

        if list.is_empty() {
            return Err(SubscriptionError::UserNotFound);
        }

        list.sort_by_key(|sub| (sub.start_date, sub.id));
        Ok(list)
    }

    async fn get_price_sum_by_user_id(
        &self,
        user_id: Uuid,
        filter: &SumFilter,
    ) -> SubscriptionResult<i64> {
        let rows = self.rows.read().await;
        let mut matched = rows
            .values()
            .filter(|sub| sub.user_id == user_id && matches_filter(sub, filter))
            .peekable();

        if matched.peek().is_none() {
            return Err(SubscriptionError::UserNotFound);
        }

        let mut total: i64 = 0;
        for sub in matched {
            total = total
                .checked_add(sub.price)
                .ok_or_else(|| SubscriptionError::store("bigint out of range"))?;
        }
        Ok(total)
    }

    async fn create(&self, subscription: &Subscription) -> SubscriptionResult<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&subscription.id) {
            return Err(SubscriptionError::store(format!(
                "duplicate key value violates unique constraint: id {}",
                subscription.id
            )));
        }

        debug!(id = %subscription.id, "Inserting subscription");
        rows.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: SubscriptionUpdate) -> SubscriptionResult<()> {
        if update.is_empty() {
            return Err(SubscriptionError::NoUpdateParameters);
        }

        let mut rows = self.rows.write().await;
        let sub = rows
            .get_mut(&id)
            .ok_or(SubscriptionError::SubscriptionNotFound)?;

        if let Some(price) = update.price {
            sub.price = price;
        }
        if let Some(end_date) = update.end_date {
            sub.end_date = Some(end_date);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> SubscriptionResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SubscriptionError::SubscriptionNotFound)
    }
}
