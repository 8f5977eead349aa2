use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveEnum, DeriveActiveEnum, EnumIter, Iterable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Text that does not name any variant of a stored enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

fn parse_variant<T>(kind: &'static str, raw: &str) -> Result<T, UnknownVariant>
where
    T: ActiveEnum<Value = String>,
{
    T::try_from_value(&raw.to_string()).map_err(|_| UnknownVariant {
        kind,
        value: raw.to_string(),
    })
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "cashier")]
    Cashier,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("role", s)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "vip")]
    Vip,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[sea_orm(string_value = "booked")]
    Booked,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl TicketStatus {
    /// Booked and paid tickets hold their seat for the showtime.
    pub fn holds_seat(&self) -> bool {
        matches!(self, TicketStatus::Booked | TicketStatus::Paid)
    }

    /// Statuses that block a seat, as used by the active seat index.
    pub fn seat_holding() -> Vec<TicketStatus> {
        TicketStatus::iter()
            .filter(TicketStatus::holds_seat)
            .collect()
    }

    /// Paid tickets are only cancelled when their payment fails.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        matches!(
            (self, next),
            (TicketStatus::Booked, TicketStatus::Paid)
                | (TicketStatus::Booked, TicketStatus::Cancelled)
                | (TicketStatus::Paid, TicketStatus::Cancelled)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "success")]
    Success,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl PaymentStatus {
    /// `failed` is terminal; a successful payment can still be reversed.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Success)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Success, PaymentStatus::Failed)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "gopay")]
    Gopay,
    #[sea_orm(string_value = "dana")]
    Dana,
    #[sea_orm(string_value = "ovo")]
    Ovo,
    #[sea_orm(string_value = "bca")]
    Bca,
    #[sea_orm(string_value = "mandiri")]
    Mandiri,
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("payment method", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Studio {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Seat {
    pub id: Uuid,
    pub studio_id: Uuid,
    pub seat_code: String,
    pub seat_type: SeatType,
    pub status: SeatStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Showtime {
    pub id: Uuid,
    pub film_id: Uuid,
    pub studio_id: Uuid,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: Uuid,
    pub showtime_id: Uuid,
    pub seat_id: Uuid,
    pub user_id: Uuid,
    pub status: TicketStatus,
    pub price: i64,
    pub booking_code: String,
    pub payment_id: Option<Uuid>,
    pub is_printed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_code: String,
    pub subtotal: i64,
    pub admin_fee: i64,
    pub total_amount: i64,
    pub amount_paid: i64,
    pub change_due: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}
