//! Repository implementations for the billing domain

pub mod subscriptions;
pub mod users;

use sqlx::PgPool;

pub use subscriptions::SubscriptionRepository;
pub use users::UserBillingRepository;

/// Combined repository access for the billing domain
#[derive(Clone)]
pub struct BillingRepositories {
    pub subscriptions: SubscriptionRepository,
    pub users: UserBillingRepository,
}

impl BillingRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            subscriptions: SubscriptionRepository::new(pool.clone()),
            users: UserBillingRepository::new(pool),
        }
    }
}
