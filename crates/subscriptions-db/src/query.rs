//! # Query Construction
//!
//! Every statement the PostgreSQL repository runs is built here.
//!
//! ## Variable-Arity Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Sum with optional filters                             │
//! │                                                                         │
//! │  SELECT SUM(price)::BIGINT FROM <table> WHERE user_id = $1             │
//! │       │                                                                 │
//! │       ├── service_name? ──► AND service_name = $n                      │
//! │       ├── from_date?    ──► AND start_date >= $n                       │
//! │       └── to_date?      ──► AND end_date <= $n                         │
//! │                                                                         │
//! │                   Partial update                                        │
//! │                                                                         │
//! │  UPDATE <table> SET                                                    │
//! │       ├── price?    ──► price = $n                                     │
//! │       └── end_date? ──► , end_date = $n                                │
//! │  WHERE id = $last                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clauses are emitted in the fixed order shown. `QueryBuilder::push_bind`
//! writes the next `$n` and binds the value in the same call, so placeholder
//! numbering and argument order cannot drift apart. Values are always bound;
//! only the validated [`TableName`] is interpolated.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use subscriptions_core::{Subscription, SubscriptionError, SubscriptionUpdate, SumFilter};

use crate::table::TableName;

/// Column list shared by every row-returning query.
pub const COLUMNS: &str = "id, service_name, price, user_id, start_date, end_date";

/// `SELECT ... WHERE id = $1`
pub fn select_by_id(table: &TableName, id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {table} WHERE id = "));
    builder.push_bind(id);
    builder
}

/// `SELECT ... WHERE user_id = $1 ORDER BY start_date, id`
pub fn select_by_user_id(table: &TableName, user_id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM {table} WHERE user_id = "));
    builder.push_bind(user_id);
    builder.push(" ORDER BY start_date, id");
    builder
}

/// Price sum for a user with the optional filters appended in order.
///
/// `SUM(BIGINT)` is `NUMERIC` in PostgreSQL; the cast keeps the scalar an `i64`.
/// The result is NULL when no row matches.
pub fn sum_price_by_user_id(
    table: &TableName,
    user_id: Uuid,
    filter: &SumFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT SUM(price)::BIGINT FROM {table} WHERE user_id = "
    ));
    builder.push_bind(user_id);

    if let Some(service_name) = &filter.service_name {
        builder.push(" AND service_name = ").push_bind(service_name.clone());
    }
    if let Some(from_date) = filter.from_date {
        builder.push(" AND start_date >= ").push_bind(from_date.to_datetime());
    }
    if let Some(to_date) = filter.to_date {
        builder.push(" AND end_date <= ").push_bind(to_date.to_datetime());
    }

    builder
}

/// `INSERT` of all six columns; an absent end date binds as NULL.
pub fn insert(table: &TableName, subscription: &Subscription) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {table} ({COLUMNS}) VALUES ("));
    {
        let mut values = builder.separated(", ");
        values.push_bind(subscription.id);
        values.push_bind(subscription.service_name.clone());
        values.push_bind(subscription.price);
        values.push_bind(subscription.user_id);
        values.push_bind(subscription.start_date.to_datetime());
        values.push_bind(subscription.end_date.map(|date| date.to_datetime()));
    }
    builder.push(")");
    builder
}

/// `UPDATE` with only the supplied assignments, price first.
///
/// ## Returns
/// * `Err(NoUpdateParameters)` - nothing to set; no statement is built
pub fn update_by_id(
    table: &TableName,
    id: Uuid,
    update: SubscriptionUpdate,
) -> Result<QueryBuilder<'static, Postgres>, SubscriptionError> {
    if update.is_empty() {
        return Err(SubscriptionError::NoUpdateParameters);
    }

    let mut builder = QueryBuilder::new(format!("UPDATE {table} SET "));
    {
        let mut assignments = builder.separated(", ");
        if let Some(price) = update.price {
            assignments.push("price = ").push_bind_unseparated(price);
        }
        if let Some(end_date) = update.end_date {
            assignments
                .push("end_date = ")
                .push_bind_unseparated(end_date.to_datetime());
        }
    }
    builder.push(" WHERE id = ").push_bind(id);

    Ok(builder)
}

/// `DELETE ... WHERE id = $1`
pub fn delete_by_id(table: &TableName, id: Uuid) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {table} WHERE id = "));
    builder.push_bind(id);
    builder
}

/// Idempotent table definition.
pub fn create_table(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
         id UUID PRIMARY KEY, \
         service_name TEXT NOT NULL, \
         price BIGINT NOT NULL, \
         user_id UUID NOT NULL, \
         start_date TIMESTAMP NOT NULL, \
         end_date TIMESTAMP NULL)"
    )
}

/// Index backing the per-user list and sum queries.
pub fn create_user_index(table: &TableName) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {table} (user_id)",
        table.index_name("user_id")
    )
}
