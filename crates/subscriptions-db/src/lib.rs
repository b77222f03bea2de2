//! # subscriptions-db: Data Store Adapter
//!
//! Translates subscription operations into parameterized SQL against a
//! single PostgreSQL table whose name comes from configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     subscriptions-db (THIS CRATE)                       │
//! │                                                                         │
//! │   ┌───────────────┐   ┌───────────────┐   ┌────────────────────────┐   │
//! │   │   Database    │   │    query      │   │     Repositories       │   │
//! │   │   (pool.rs)   │   │  (query.rs)   │   │                        │   │
//! │   │               │   │               │   │ PgSubscriptionRepo     │   │
//! │   │ PgPool        │◄──│ QueryBuilder  │◄──│ MemorySubscriptionRepo │   │
//! │   │ ping, schema  │   │ $n bindings   │   │                        │   │
//! │   └───────────────┘   └───────────────┘   └────────────────────────┘   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │   PostgreSQL: one table (id, service_name, price, user_id,             │
//! │               start_date, end_date)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pool`] - Connection pool, startup ping, schema bootstrap
//! - [`table`] - Validated table names
//! - [`query`] - SQL construction
//! - [`repository`] - PostgreSQL and in-memory repositories
//! - [`error`] - Setup error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use subscriptions_db::{Database, DbConfig};
//!
//! let db = Database::connect(DbConfig::new(url, "subscriptions")).await?;
//! db.ping().await?;
//! db.ensure_schema().await?;
//!
//! let repo = db.subscriptions();
//! ```

pub mod error;
pub mod pool;
pub mod query;
pub mod repository;
pub mod table;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::memory::MemorySubscriptionRepository;
pub use repository::postgres::PgSubscriptionRepository;
pub use table::TableName;
