//! HTTP route handlers.
//!
//! ```text
//! GET    /health                 liveness
//! GET    /subscriptions          list by ?user_id=
//! POST   /subscriptions          create from JSON body
//! GET    /subscriptions/price    price sum by ?user_id= plus optional filters
//! GET    /subscriptions/{id}     fetch one
//! PATCH  /subscriptions/{id}     ?price= and/or ?end_date=
//! DELETE /subscriptions/{id}     remove one
//! ```

use serde::Serialize;

pub mod health;
pub mod subscriptions;

/// Body for responses that carry only a message.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}
