use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Seat, SeatStatus, SeatType, Studio};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SeatList {
    #[schema(value_type = Vec<Seat>)]
    pub items: Vec<Seat>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudioSeats {
    pub studio: Studio,
    pub seats: Vec<Seat>,
}

/// A seat that can still be booked for a showtime, with its quoted price.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableSeat {
    pub id: Uuid,
    pub seat_code: String,
    pub seat_type: SeatType,
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableSeats {
    pub showtime_id: Uuid,
    pub studio_id: Uuid,
    pub seats: Vec<AvailableSeat>,
    pub total_available: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSeatStatusRequest {
    pub status: SeatStatus,
}
