//! # Domain Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Subscription                                  │
//! │  ───────────────────────────────────────────────────────────────────    │
//! │  id            UUID         set once by the creator, immutable          │
//! │  service_name  text         markup stripped before it gets here         │
//! │  price         i64          minor currency unit, mutable                │
//! │  user_id       UUID         owner, not checked against any user table   │
//! │  start_date    MonthDate    immutable                                   │
//! │  end_date      MonthDate?   mutable, absent = ongoing                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::month::MonthDate;

/// A user's paid enrollment in a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: MonthDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthDate>,
}

/// Optional filters for the price sum, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SumFilter {
    /// Exact match on `service_name`.
    pub service_name: Option<String>,
    /// `start_date >= from_date`.
    pub from_date: Option<MonthDate>,
    /// `end_date <= to_date`. Ongoing subscriptions never match.
    pub to_date: Option<MonthDate>,
}

/// Fields a partial update may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub price: Option<i64>,
    pub end_date: Option<MonthDate>,
}

impl SubscriptionUpdate {
    /// True when there is nothing to change.
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.end_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscription {
        Subscription {
            id: Uuid::nil(),
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: Uuid::nil(),
            start_date: MonthDate::parse("07-2025").unwrap(),
            end_date: None,
        }
    }

    #[test]
    fn test_json_omits_missing_end_date() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(json["start_date"], "07-2025");
        assert_eq!(json["price"], 400);
        assert!(json.get("end_date").is_none());
    }

    #[test]
    fn test_json_includes_end_date() {
        let mut sub = sample();
        sub.end_date = MonthDate::new(2025, 12);

        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["end_date"], "12-2025");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(SubscriptionUpdate::default().is_empty());
        assert!(!SubscriptionUpdate { price: Some(1), end_date: None }.is_empty());
        assert!(!SubscriptionUpdate { price: None, end_date: MonthDate::new(2024, 1) }.is_empty());
    }
}
