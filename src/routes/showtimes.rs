use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::seats::{AvailableSeats, SeatList},
    error::AppResult,
    response::ApiResponse,
    services::seat_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/seats/available", get(available_seats))
        .route("/{id}/seats/booked", get(booked_seats))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}/seats/available",
    params(("id" = Uuid, Path, description = "Showtime ID")),
    responses(
        (status = 200, description = "Bookable seats with their price", body = ApiResponse<AvailableSeats>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Seats"
)]
pub async fn available_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AvailableSeats>>> {
    let resp = seat_service::available_seats(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/showtimes/{id}/seats/booked",
    params(("id" = Uuid, Path, description = "Showtime ID")),
    responses(
        (status = 200, description = "Seats held by booked or paid tickets", body = ApiResponse<SeatList>),
        (status = 404, description = "Showtime not found"),
    ),
    tag = "Seats"
)]
pub async fn booked_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SeatList>>> {
    let resp = seat_service::booked_seats(&state, id).await?;
    Ok(Json(resp))
}
