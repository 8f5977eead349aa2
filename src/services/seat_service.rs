use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::audit_after_commit,
    dto::seats::{AvailableSeat, AvailableSeats, SeatList, StudioSeats, UpdateSeatStatusRequest},
    entity::{
        seats::{ActiveModel as SeatActive, Column as SeatCol, Entity as Seats},
        showtimes::Entity as Showtimes,
        studios::Entity as Studios,
        tickets::{Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Seat, SeatStatus, TicketStatus},
    response::{ApiResponse, Meta},
    seat_code::sort_by_seat_code,
    services::convert::{seat_from_entity, showtime_from_entity, studio_from_entity},
    state::AppState,
};

/// Every seat of a studio in row/number order.
pub async fn studio_seats<C: ConnectionTrait>(conn: &C, studio_id: Uuid) -> AppResult<Vec<Seat>> {
    let mut seats = Seats::find()
        .filter(SeatCol::StudioId.eq(studio_id))
        .all(conn)
        .await?
        .into_iter()
        .map(seat_from_entity)
        .collect::<Vec<_>>();
    sort_by_seat_code(&mut seats, |seat| seat.seat_code.as_str());
    Ok(seats)
}

/// Seats held by a booked or paid ticket for the showtime.
pub async fn booked_seat_ids<C: ConnectionTrait>(
    conn: &C,
    showtime_id: Uuid,
) -> AppResult<HashSet<Uuid>> {
    let ids: Vec<Uuid> = Tickets::find()
        .select_only()
        .column(TicketCol::SeatId)
        .filter(TicketCol::ShowtimeId.eq(showtime_id))
        .filter(TicketCol::Status.is_in(TicketStatus::seat_holding()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(ids.into_iter().collect())
}

pub async fn list_seats(state: &AppState, studio_id: Uuid) -> AppResult<ApiResponse<StudioSeats>> {
    let studio = Studios::find_by_id(studio_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Studio"))?;

    let seats = studio_seats(&state.orm, studio_id).await?;
    let meta = Meta::count(seats.len());
    Ok(ApiResponse::success(
        "OK",
        StudioSeats {
            studio: studio_from_entity(studio),
            seats,
        },
        Some(meta),
    ))
}

pub async fn available_seats(
    state: &AppState,
    showtime_id: Uuid,
) -> AppResult<ApiResponse<AvailableSeats>> {
    let showtime = Showtimes::find_by_id(showtime_id)
        .one(&state.orm)
        .await?
        .map(showtime_from_entity)
        .ok_or(AppError::NotFound("Showtime"))?;

    let booked = booked_seat_ids(&state.orm, showtime.id).await?;
    let seats: Vec<AvailableSeat> = studio_seats(&state.orm, showtime.studio_id)
        .await?
        .into_iter()
        .filter(|seat| seat.status == SeatStatus::Available && !booked.contains(&seat.id))
        .map(|seat| AvailableSeat {
            price: state.pricing.quote(&showtime, &seat),
            id: seat.id,
            seat_code: seat.seat_code,
            seat_type: seat.seat_type,
        })
        .collect();

    let meta = Meta::count(seats.len());
    Ok(ApiResponse::success(
        "OK",
        AvailableSeats {
            showtime_id: showtime.id,
            studio_id: showtime.studio_id,
            total_available: seats.len(),
            seats,
        },
        Some(meta),
    ))
}

pub async fn booked_seats(state: &AppState, showtime_id: Uuid) -> AppResult<ApiResponse<SeatList>> {
    let showtime = Showtimes::find_by_id(showtime_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Showtime"))?;

    let booked = booked_seat_ids(&state.orm, showtime.id).await?;
    let items: Vec<Seat> = studio_seats(&state.orm, showtime.studio_id)
        .await?
        .into_iter()
        .filter(|seat| booked.contains(&seat.id))
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("OK", SeatList { items }, Some(meta)))
}

pub async fn set_seat_status(
    state: &AppState,
    user: &AuthUser,
    seat_id: Uuid,
    payload: UpdateSeatStatusRequest,
) -> AppResult<ApiResponse<Seat>> {
    ensure_admin(user)?;

    let seat = Seats::find_by_id(seat_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Seat"))?;

    let previous = seat.status;
    let mut active: SeatActive = seat.into();
    active.status = Set(payload.status);
    let seat = seat_from_entity(active.update(&state.orm).await?);

    tracing::info!(seat_id = %seat.id, from = ?previous, to = ?seat.status, "seat status updated");
    audit_after_commit(
        &state.pool,
        user.user_id,
        "seat_status_updated",
        "seats",
        serde_json::json!({ "seat_id": seat.id, "from": previous, "to": seat.status }),
    )
    .await;

    Ok(ApiResponse::success("Seat updated", seat, Some(Meta::empty())))
}
