use std::sync::Arc;

use chrono::Duration;

use crate::{
    db::{DbPool, OrmConn},
    pricing::{FlatPricing, PricingStrategy},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub pricing: Arc<dyn PricingStrategy>,
    pub booking_hold: Duration,
}

impl AppState {
    pub fn new(orm: OrmConn, pricing: Arc<dyn PricingStrategy>, hold_minutes: i64) -> Self {
        let pool = orm.get_postgres_connection_pool().clone();
        Self {
            pool,
            orm,
            pricing,
            booking_hold: Duration::minutes(hold_minutes),
        }
    }

    /// State with flat pricing and the default hold window.
    pub fn with_flat_pricing(orm: OrmConn) -> Self {
        Self::new(orm, Arc::new(FlatPricing), 15)
    }
}
