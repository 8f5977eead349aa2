use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Ticket;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookSeatsRequest {
    pub showtime_id: Uuid,
    pub seat_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    AlreadyBooked,
    UnderMaintenance,
}

/// A requested seat that was not reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeatRejection {
    pub seat_id: Uuid,
    pub seat_code: String,
    pub reason: RejectionReason,
}

impl SeatRejection {
    pub fn message(&self) -> String {
        match self.reason {
            RejectionReason::AlreadyBooked => format!("Seat {} is already booked", self.seat_code),
            RejectionReason::UnderMaintenance => {
                format!("Seat {} is under maintenance", self.seat_code)
            }
        }
    }
}

/// Result of a booking call: the committed tickets plus the seats that were
/// turned away. Never empty on the ticket side.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingOutcome {
    pub tickets: Vec<Ticket>,
    pub rejected: Vec<SeatRejection>,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TicketList {
    #[schema(value_type = Vec<Ticket>)]
    pub items: Vec<Ticket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReleasedBookings {
    pub released: u64,
}
