use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_after_commit,
    dto::bookings::{
        BookSeatsRequest, BookingOutcome, RejectionReason, ReleasedBookings, SeatRejection,
        TicketList,
    },
    entity::{
        seats::{Column as SeatCol, Entity as Seats},
        showtimes::Entity as Showtimes,
        tickets::{ActiveModel as TicketActive, Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, Seat, SeatStatus, Showtime, Ticket, TicketStatus},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{
        build_code,
        convert::{seat_from_entity, showtime_from_entity, ticket_from_entity},
        dedupe_ids,
        seat_service::booked_seat_ids,
    },
    state::AppState,
};

/// Requested seats split into those that can be reserved and those that
/// cannot.
#[derive(Debug, Default)]
pub struct SeatPartition {
    pub free: Vec<Seat>,
    pub rejected: Vec<SeatRejection>,
}

pub fn partition_seats(requested: Vec<Seat>, booked: &HashSet<Uuid>) -> SeatPartition {
    let mut partition = SeatPartition::default();
    for seat in requested {
        let reason = if booked.contains(&seat.id) {
            Some(RejectionReason::AlreadyBooked)
        } else if seat.status == SeatStatus::Maintenance {
            Some(RejectionReason::UnderMaintenance)
        } else {
            None
        };

        match reason {
            Some(reason) => partition.rejected.push(SeatRejection {
                seat_id: seat.id,
                seat_code: seat.seat_code,
                reason,
            }),
            None => partition.free.push(seat),
        }
    }
    partition
}

pub fn total_price(tickets: &[Ticket]) -> i64 {
    tickets.iter().map(|ticket| ticket.price).sum()
}

/// Loads the requested seats in request order. Unknown ids are `NotFound`;
/// a seat of another studio is `SeatNotInStudio`.
async fn resolve_requested_seats<C: ConnectionTrait>(
    conn: &C,
    studio_id: Uuid,
    seat_ids: &[Uuid],
) -> AppResult<Vec<Seat>> {
    let mut found: HashMap<Uuid, Seat> = Seats::find()
        .filter(SeatCol::Id.is_in(seat_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| {
            let seat = seat_from_entity(model);
            (seat.id, seat)
        })
        .collect();

    seat_ids
        .iter()
        .map(|id| match found.remove(id) {
            Some(seat) if seat.studio_id == studio_id => Ok(seat),
            Some(_) => Err(AppError::SeatNotInStudio(*id)),
            None => Err(AppError::NotFound("Seat")),
        })
        .collect()
}

/// Inserts one booked ticket inside a savepoint. `Ok(None)` means the active
/// seat index rejected the row because another booking got there first.
async fn insert_ticket(
    txn: &DatabaseTransaction,
    user: &AuthUser,
    showtime: &Showtime,
    seat: &Seat,
    price: i64,
) -> AppResult<Option<Ticket>> {
    let savepoint = txn.begin().await?;
    let id = Uuid::new_v4();
    let inserted = TicketActive {
        id: Set(id),
        showtime_id: Set(showtime.id),
        seat_id: Set(seat.id),
        user_id: Set(user.user_id),
        status: Set(TicketStatus::Booked),
        price: Set(price),
        booking_code: Set(build_code("TKT", id)),
        payment_id: Set(None),
        is_printed: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(model) => {
            savepoint.commit().await?;
            Ok(Some(ticket_from_entity(model)))
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            savepoint.rollback().await?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn book_seats(
    state: &AppState,
    user: &AuthUser,
    payload: BookSeatsRequest,
) -> AppResult<ApiResponse<BookingOutcome>> {
    let seat_ids = dedupe_ids(&payload.seat_ids);
    if seat_ids.is_empty() {
        return Err(AppError::BadRequest(
            "seat_ids must contain at least one seat".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    // Row lock on the showtime serialises concurrent bookings for it.
    let showtime = Showtimes::find_by_id(payload.showtime_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .map(showtime_from_entity)
        .ok_or(AppError::NotFound("Showtime"))?;

    let requested = resolve_requested_seats(&txn, showtime.studio_id, &seat_ids).await?;
    let booked = booked_seat_ids(&txn, showtime.id).await?;
    let SeatPartition { free, mut rejected } = partition_seats(requested, &booked);

    let mut tickets: Vec<Ticket> = Vec::with_capacity(free.len());
    for seat in free {
        let price = state.pricing.quote(&showtime, &seat);
        match insert_ticket(&txn, user, &showtime, &seat, price).await? {
            Some(ticket) => tickets.push(ticket),
            None => {
                tracing::debug!(seat_id = %seat.id, showtime_id = %showtime.id, "seat taken concurrently");
                rejected.push(SeatRejection {
                    seat_id: seat.id,
                    seat_code: seat.seat_code,
                    reason: RejectionReason::AlreadyBooked,
                });
            }
        }
    }

    if tickets.is_empty() {
        txn.rollback().await?;
        tracing::debug!(
            showtime_id = %showtime.id,
            rejected = rejected.len(),
            "booking rejected, no seat available"
        );
        return Err(AppError::AllSeatsUnavailable(rejected));
    }

    txn.commit().await?;

    let total_price = total_price(&tickets);
    tracing::info!(
        user_id = %user.user_id,
        showtime_id = %showtime.id,
        booked = tickets.len(),
        rejected = rejected.len(),
        total_price,
        "seats booked"
    );

    audit_after_commit(
        &state.pool,
        user.user_id,
        "ticket_booked",
        "tickets",
        serde_json::json!({
            "showtime_id": showtime.id,
            "ticket_ids": tickets.iter().map(|t| t.id).collect::<Vec<_>>(),
            "rejected_seat_ids": rejected.iter().map(|r| r.seat_id).collect::<Vec<_>>(),
        }),
    )
    .await;

    let message = if rejected.is_empty() {
        format!("{} tickets booked", tickets.len())
    } else {
        format!(
            "{} tickets booked, {} seats unavailable",
            tickets.len(),
            rejected.len()
        )
    };

    Ok(ApiResponse::success(
        message,
        BookingOutcome {
            tickets,
            rejected,
            total_price,
        },
        Some(Meta::empty()),
    ))
}

pub async fn cancel_ticket(
    state: &AppState,
    user: &AuthUser,
    ticket_id: Uuid,
) -> AppResult<ApiResponse<Ticket>> {
    let txn = state.orm.begin().await?;

    let ticket = Tickets::find_by_id(ticket_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .filter(|t| t.user_id == user.user_id || user.role == Role::Admin)
        .ok_or(AppError::NotFound("Ticket"))?;

    // Paid tickets are released only through a failed payment.
    if ticket.status != TicketStatus::Booked {
        return Err(AppError::BadRequest(format!(
            "Ticket is {:?} and cannot be cancelled",
            ticket.status
        )));
    }

    let mut active: TicketActive = ticket.into();
    active.status = Set(TicketStatus::Cancelled);
    active.updated_at = Set(Utc::now().into());
    let ticket = ticket_from_entity(active.update(&txn).await?);
    txn.commit().await?;

    tracing::info!(ticket_id = %ticket.id, seat_id = %ticket.seat_id, "ticket cancelled");
    audit_after_commit(
        &state.pool,
        user.user_id,
        "ticket_cancelled",
        "tickets",
        serde_json::json!({ "ticket_id": ticket.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Ticket cancelled",
        ticket,
        Some(Meta::empty()),
    ))
}

/// Cancels booked tickets created before `cutoff`; returns how many.
pub async fn release_bookings_created_before<C: ConnectionTrait>(
    conn: &C,
    cutoff: DateTime<Utc>,
) -> AppResult<u64> {
    let result = Tickets::update_many()
        .col_expr(TicketCol::Status, Expr::value(TicketStatus::Cancelled))
        .col_expr(TicketCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(TicketCol::Status.eq(TicketStatus::Booked))
        .filter(TicketCol::CreatedAt.lt(cutoff))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn release_expired_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReleasedBookings>> {
    ensure_admin(user)?;

    let cutoff = Utc::now() - state.booking_hold;
    let released = release_bookings_created_before(&state.orm, cutoff).await?;

    tracing::info!(released, %cutoff, "expired bookings released");
    if released > 0 {
        audit_after_commit(
            &state.pool,
            user.user_id,
            "tickets_released",
            "tickets",
            serde_json::json!({ "released": released, "cutoff": cutoff }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Expired bookings released",
        ReleasedBookings { released },
        Some(Meta::empty()),
    ))
}

pub async fn list_user_tickets(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<TicketList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Tickets::find()
        .filter(TicketCol::UserId.eq(user.user_id))
        .order_by_desc(TicketCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Ticket> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ticket_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        TicketList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_ticket(
    state: &AppState,
    user: &AuthUser,
    ticket_id: Uuid,
) -> AppResult<ApiResponse<Ticket>> {
    let ticket = Tickets::find_by_id(ticket_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Ticket"))?;

    if ticket.user_id != user.user_id && !user.is_staff() {
        return Err(AppError::NotFound("Ticket"));
    }

    Ok(ApiResponse::success(
        "OK",
        ticket_from_entity(ticket),
        Some(Meta::empty()),
    ))
}
