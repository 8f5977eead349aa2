//! Seat price quotes and payment admin fees.
//!
//! Booking and settlement only talk to [`PricingStrategy`]; which strategy is
//! active is decided once at startup from configuration.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::ticket_prices::{Column as PriceCol, Entity as TicketPrices},
    error::AppResult,
    models::{PaymentMethod, SeatType, Seat, Showtime},
};

/// Flat surcharge added on top of the base price for VIP seats.
pub const VIP_SURCHARGE: i64 = 20_000;

pub trait PricingStrategy: Send + Sync {
    /// Price charged for `seat` at `showtime`.
    fn quote(&self, showtime: &Showtime, seat: &Seat) -> i64;
}

fn seat_surcharge(seat: &Seat) -> i64 {
    match seat.seat_type {
        SeatType::Vip => VIP_SURCHARGE,
        SeatType::Regular => 0,
    }
}

/// Showtime base price plus the VIP surcharge.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatPricing;

impl PricingStrategy for FlatPricing {
    fn quote(&self, showtime: &Showtime, seat: &Seat) -> i64 {
        showtime.price + seat_surcharge(seat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTier {
    Weekday,
    Weekend,
    Holiday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTiers {
    pub weekday: i64,
    pub weekend: i64,
    pub holiday: i64,
}

impl PriceTiers {
    pub fn price_for(&self, tier: DayTier) -> i64 {
        match tier {
            DayTier::Weekday => self.weekday,
            DayTier::Weekend => self.weekend,
            DayTier::Holiday => self.holiday,
        }
    }
}

/// Per-studio weekday/weekend/holiday tables. Studios without an active table
/// are priced like [`FlatPricing`].
#[derive(Debug, Clone, Default)]
pub struct TieredPricing {
    tables: HashMap<Uuid, PriceTiers>,
    holidays: HashSet<NaiveDate>,
}

impl TieredPricing {
    pub fn new(tables: HashMap<Uuid, PriceTiers>, holidays: HashSet<NaiveDate>) -> Self {
        Self { tables, holidays }
    }

    /// Loads every active ticket price table. When a studio has several active
    /// tables the most recently created one wins.
    pub async fn load(
        orm: &DatabaseConnection,
        holidays: HashSet<NaiveDate>,
    ) -> AppResult<Self> {
        let mut rows = TicketPrices::find()
            .filter(PriceCol::IsActive.eq(true))
            .all(orm)
            .await?;
        rows.sort_by_key(|row| row.created_at);

        let tables = rows
            .into_iter()
            .map(|row| {
                (
                    row.studio_id,
                    PriceTiers {
                        weekday: row.weekday_price,
                        weekend: row.weekend_price,
                        holiday: row.holiday_price,
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        tracing::info!(
            studios = tables.len(),
            holidays = holidays.len(),
            "loaded tiered ticket prices"
        );
        Ok(Self::new(tables, holidays))
    }

    pub fn day_tier(&self, date: NaiveDate) -> DayTier {
        if self.holidays.contains(&date) {
            DayTier::Holiday
        } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            DayTier::Weekend
        } else {
            DayTier::Weekday
        }
    }
}

impl PricingStrategy for TieredPricing {
    fn quote(&self, showtime: &Showtime, seat: &Seat) -> i64 {
        let base = match self.tables.get(&showtime.studio_id) {
            Some(tiers) => tiers.price_for(self.day_tier(showtime.show_date)),
            None => showtime.price,
        };
        base + seat_surcharge(seat)
    }
}

impl PaymentMethod {
    /// Admin fee charged on top of the ticket subtotal.
    pub fn admin_fee(&self) -> i64 {
        match self {
            PaymentMethod::Cash | PaymentMethod::Gopay | PaymentMethod::Dana | PaymentMethod::Ovo => 0,
            PaymentMethod::Transfer | PaymentMethod::Bca | PaymentMethod::Mandiri => 2_500,
        }
    }
}

/// Authoritative amounts for a settlement, recomputed server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charge {
    pub subtotal: i64,
    pub admin_fee: i64,
    pub total: i64,
}

impl Charge {
    pub fn compute(quotes: impl IntoIterator<Item = i64>, method: PaymentMethod) -> Self {
        let subtotal: i64 = quotes.into_iter().sum();
        let admin_fee = method.admin_fee();
        Self {
            subtotal,
            admin_fee,
            total: subtotal + admin_fee,
        }
    }
}
