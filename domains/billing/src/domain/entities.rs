//! Billing entities
//!
//! The local subscription record mirrors the gateway's state at creation
//! time. Renewals and cancellations never touch it (webhooks are out of
//! scope), so `status` and the period columns are a snapshot, not a view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A subscription row, written once per successful gateway subscription.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_subscription_id: String,
    pub stripe_price_id: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_record_serializes_camel_case() {
        let record = SubscriptionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            stripe_subscription_id: "sub_123".to_string(),
            stripe_price_id: "price_123".to_string(),
            status: "incomplete".to_string(),
            current_period_start: Utc::now(),
            current_period_end: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["stripeSubscriptionId"], serde_json::json!("sub_123"));
        assert_eq!(json["stripePriceId"], serde_json::json!("price_123"));
        assert!(json.get("currentPeriodStart").is_some());
        assert!(json.get("stripe_subscription_id").is_none());
    }
}
