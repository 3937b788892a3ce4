//! Subscription repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use starter_common::Result;
use uuid::Uuid;

use crate::domain::entities::SubscriptionRecord;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, stripe_subscription_id, stripe_price_id, \
     status, current_period_start, current_period_end, created_at, updated_at";

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist the local mirror of a gateway subscription
    pub async fn create(
        &self,
        user_id: Uuid,
        stripe_subscription_id: &str,
        stripe_price_id: &str,
        status: &str,
        current_period_start: DateTime<Utc>,
        current_period_end: DateTime<Utc>,
    ) -> Result<SubscriptionRecord> {
        let row = sqlx::query_as::<_, SubscriptionRecord>(&format!(
            r#"
            INSERT INTO subscriptions
                (id, user_id, stripe_subscription_id, stripe_price_id, status,
                 current_period_start, current_period_end, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(stripe_subscription_id)
        .bind(stripe_price_id)
        .bind(status)
        .bind(current_period_start)
        .bind(current_period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
