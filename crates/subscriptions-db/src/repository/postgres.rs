//! # PostgreSQL Subscription Repository
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Condition              Result                     │
//! │  ───────────────────  ─────────────────────  ─────────────────────────  │
//! │  get_by_id            no row                 SubscriptionNotFound       │
//! │  get_list_by_user_id  no rows                UserNotFound               │
//! │  get_price_sum        SUM is NULL            UserNotFound               │
//! │  update_by_id         empty update           NoUpdateParameters         │
//! │  update_by_id         0 rows affected        SubscriptionNotFound       │
//! │  delete_by_id         0 rows affected        SubscriptionNotFound       │
//! │  any                  sqlx::Error            Store(source unchanged)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use subscriptions_core::{
    MonthDate, Subscription, SubscriptionError, SubscriptionRepository, SubscriptionResult,
    SubscriptionUpdate, SumFilter,
};

use crate::query;
use crate::table::TableName;

/// Row shape of the subscriptions table.
///
/// Kept apart from [`Subscription`] so timestamp columns are truncated to
/// months in exactly one place.
#[derive(Debug, Clone, FromRow)]
struct SubscriptionRow {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: Uuid,
    start_date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: MonthDate::from_datetime(row.start_date),
            end_date: row.end_date.map(MonthDate::from_datetime),
        }
    }
}

/// Repository over one PostgreSQL table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.subscriptions();
/// let sub = repo.get_by_id(id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
    table: TableName,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        PgSubscriptionRepository { pool, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn get_by_id(&self, id: Uuid) -> SubscriptionResult<Subscription> {
        debug!(%id, "Fetching subscription");

        let row = query::select_by_id(&self.table, id)
            .build_query_as::<SubscriptionRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        row.map(Subscription::from)
            .ok_or(SubscriptionError::SubscriptionNotFound)
    }

    async fn get_list_by_user_id(&self, user_id: Uuid) -> SubscriptionResult<Vec<Subscription>> {
        debug!(%user_id, "Listing subscriptions");

        let rows = query::select_by_user_id(&self.table, user_id)
            .build_query_as::<SubscriptionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        if rows.is_empty() {
            return Err(SubscriptionError::UserNotFound);
        }

        debug!(count = rows.len(), "Listed subscriptions");
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn get_price_sum_by_user_id(
        &self,
        user_id: Uuid,
        filter: &SumFilter,
    ) -> SubscriptionResult<i64> {
        debug!(
            %user_id,
            service_name = filter.service_name.is_some(),
            from_date = ?filter.from_date,
            to_date = ?filter.to_date,
            "Summing subscription prices"
        );

        let sum: Option<i64> = query::sum_price_by_user_id(&self.table, user_id, filter)
            .build_query_scalar::<Option<i64>>()
            .fetch_one(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        sum.ok_or(SubscriptionError::UserNotFound)
    }

    async fn create(&self, subscription: &Subscription) -> SubscriptionResult<()> {
        debug!(id = %subscription.id, user_id = %subscription.user_id, "Inserting subscription");

        query::insert(&self.table, subscription)
            .build()
            .execute(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        Ok(())
    }

    async fn update_by_id(&self, id: Uuid, update: SubscriptionUpdate) -> SubscriptionResult<()> {
        let mut builder = query::update_by_id(&self.table, id, update)?;

        debug!(
            %id,
            price = update.price.is_some(),
            end_date = ?update.end_date,
            "Updating subscription"
        );

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        if result.rows_affected() == 0 {
            return Err(SubscriptionError::SubscriptionNotFound);
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> SubscriptionResult<()> {
        debug!(%id, "Deleting subscription");

        let result = query::delete_by_id(&self.table, id)
            .build()
            .execute(&self.pool)
            .await
            .map_err(SubscriptionError::store)?;

        if result.rows_affected() == 0 {
            return Err(SubscriptionError::SubscriptionNotFound);
        }

        Ok(())
    }
}
