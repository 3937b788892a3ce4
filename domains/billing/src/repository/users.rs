//! Billing view of the users table
//!
//! The billing domain only touches the `stripe_customer_id` column;
//! everything else on the user row belongs to the auth crate.

use sqlx::PgPool;
use starter_common::{Error, Result};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserBillingRepository {
    pool: PgPool,
}

impl UserBillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a freshly created gateway customer id on the user row
    pub async fn set_stripe_customer_id(&self, user_id: Uuid, customer_id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET stripe_customer_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(customer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
