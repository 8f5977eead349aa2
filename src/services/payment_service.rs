use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::audit_after_commit,
    dto::payments::{
        PaymentList, PaymentListQuery, PaymentWithTickets, SettleRequest, UpdatePaymentStatusRequest,
    },
    entity::{
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments},
        seats::{Column as SeatCol, Entity as Seats},
        showtimes::{Column as ShowtimeCol, Entity as Showtimes},
        tickets::{ActiveModel as TicketActive, Column as TicketCol, Entity as Tickets, Model as TicketModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{PaymentMethod, PaymentStatus, Seat, Showtime, Ticket, TicketStatus, UnknownVariant},
    pricing::{Charge, PricingStrategy},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{
        build_code,
        convert::{payment_from_entity, seat_from_entity, showtime_from_entity, ticket_from_entity},
        dedupe_ids,
    },
    state::AppState,
};

/// Recomputes the quote of every ticket from its showtime and seat.
async fn quote_tickets<C: ConnectionTrait>(
    conn: &C,
    pricing: &dyn PricingStrategy,
    tickets: &[TicketModel],
) -> AppResult<Vec<i64>> {
    let showtime_ids: HashSet<Uuid> = tickets.iter().map(|t| t.showtime_id).collect();
    let seat_ids: HashSet<Uuid> = tickets.iter().map(|t| t.seat_id).collect();

    let showtimes: HashMap<Uuid, Showtime> = Showtimes::find()
        .filter(ShowtimeCol::Id.is_in(showtime_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| (model.id, showtime_from_entity(model)))
        .collect();

    let seats: HashMap<Uuid, Seat> = Seats::find()
        .filter(SeatCol::Id.is_in(seat_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| {
            let seat = seat_from_entity(model);
            (seat.id, seat)
        })
        .collect();

    tickets
        .iter()
        .map(|ticket| {
            let showtime = showtimes
                .get(&ticket.showtime_id)
                .ok_or(AppError::NotFound("Showtime"))?;
            let seat = seats.get(&ticket.seat_id).ok_or(AppError::NotFound("Seat"))?;
            Ok(pricing.quote(showtime, seat))
        })
        .collect()
}

pub async fn settle(
    state: &AppState,
    payer: &AuthUser,
    payload: SettleRequest,
) -> AppResult<ApiResponse<PaymentWithTickets>> {
    let method: PaymentMethod = payload
        .method
        .parse()
        .map_err(|err: UnknownVariant| AppError::BadRequest(err.to_string()))?;

    let ticket_ids = dedupe_ids(&payload.ticket_ids);
    if ticket_ids.is_empty() {
        return Err(AppError::BadRequest(
            "ticket_ids must contain at least one ticket".into(),
        ));
    }
    if payload.amount < 0 {
        return Err(AppError::BadRequest("amount must not be negative".into()));
    }

    let txn = state.orm.begin().await?;

    let tickets = Tickets::find()
        .filter(TicketCol::Id.is_in(ticket_ids.iter().copied()))
        .order_by_asc(TicketCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if tickets.len() != ticket_ids.len() {
        return Err(AppError::NotFound("Ticket"));
    }

    let invalid: Vec<Uuid> = tickets
        .iter()
        .filter(|t| t.user_id != payer.user_id || !t.status.can_transition_to(TicketStatus::Paid))
        .map(|t| t.id)
        .collect();
    if !invalid.is_empty() {
        return Err(AppError::TicketsNotOwnedOrInvalidState(invalid));
    }

    let quotes = quote_tickets(&txn, state.pricing.as_ref(), &tickets).await?;
    let charge = Charge::compute(quotes, method);

    if payload.amount < charge.total {
        txn.rollback().await?;
        tracing::debug!(
            expected = charge.total,
            claimed = payload.amount,
            "settlement rejected, amount too low"
        );
        return Err(AppError::InsufficientAmount {
            expected: charge.total,
            claimed: payload.amount,
        });
    }

    let payment_id = Uuid::new_v4();
    let payment = PaymentActive {
        id: Set(payment_id),
        user_id: Set(payer.user_id),
        booking_code: Set(build_code("BK", payment_id)),
        subtotal: Set(charge.subtotal),
        admin_fee: Set(charge.admin_fee),
        total_amount: Set(charge.total),
        amount_paid: Set(payload.amount),
        change_due: Set(payload.amount - charge.total),
        method: Set(method),
        status: Set(PaymentStatus::Success),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let updated = Tickets::update_many()
        .col_expr(TicketCol::Status, Expr::value(TicketStatus::Paid))
        .col_expr(TicketCol::PaymentId, Expr::value(payment.id))
        .col_expr(TicketCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(TicketCol::Id.is_in(ticket_ids.iter().copied()))
        .filter(TicketCol::Status.eq(TicketStatus::Booked))
        .exec(&txn)
        .await?;
    if updated.rows_affected != ticket_ids.len() as u64 {
        return Err(AppError::Internal(anyhow::anyhow!(
            "expected to settle {} tickets, updated {}",
            ticket_ids.len(),
            updated.rows_affected
        )));
    }

    let tickets = linked_tickets(&txn, payment.id).await?;

    txn.commit().await?;

    let payment = payment_from_entity(payment);
    tracing::info!(
        payment_id = %payment.id,
        user_id = %payer.user_id,
        tickets = tickets.len(),
        total = payment.total_amount,
        method = ?payment.method,
        "payment settled"
    );
    audit_after_commit(
        &state.pool,
        payer.user_id,
        "payment_settled",
        "payments",
        serde_json::json!({
            "payment_id": payment.id,
            "ticket_ids": ticket_ids,
            "total_amount": payment.total_amount,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment recorded",
        PaymentWithTickets { payment, tickets },
        Some(Meta::empty()),
    ))
}

pub async fn mark_printed(
    state: &AppState,
    actor: &AuthUser,
    ticket_id: Uuid,
) -> AppResult<ApiResponse<Ticket>> {
    let ticket = Tickets::find_by_id(ticket_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Ticket"))?;

    if ticket.user_id != actor.user_id && !actor.is_staff() {
        return Err(AppError::Forbidden);
    }
    if ticket.status == TicketStatus::Cancelled {
        return Err(AppError::BadRequest("Cancelled tickets cannot be printed".into()));
    }
    if ticket.is_printed {
        return Ok(ApiResponse::success(
            "Ticket already printed",
            ticket_from_entity(ticket),
            Some(Meta::empty()),
        ));
    }

    let mut active: TicketActive = ticket.into();
    active.is_printed = Set(true);
    active.updated_at = Set(Utc::now().into());
    let ticket = ticket_from_entity(active.update(&state.orm).await?);

    audit_after_commit(
        &state.pool,
        actor.user_id,
        "ticket_printed",
        "tickets",
        serde_json::json!({ "ticket_id": ticket.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Ticket marked as printed",
        ticket,
        Some(Meta::empty()),
    ))
}

pub async fn payment_history(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<PaymentList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Payments::find()
        .filter(PaymentCol::UserId.eq(user.user_id))
        .order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_payment(
    state: &AppState,
    user: &AuthUser,
    payment_id: Uuid,
) -> AppResult<ApiResponse<PaymentWithTickets>> {
    let payment = Payments::find_by_id(payment_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    if payment.user_id != user.user_id && !user.is_staff() {
        return Err(AppError::NotFound("Payment"));
    }

    let tickets = linked_tickets(&state.orm, payment.id).await?;

    Ok(ApiResponse::success(
        "OK",
        PaymentWithTickets {
            payment: payment_from_entity(payment),
            tickets,
        },
        Some(Meta::empty()),
    ))
}

async fn linked_tickets<C: ConnectionTrait>(conn: &C, payment_id: Uuid) -> AppResult<Vec<Ticket>> {
    Ok(Tickets::find()
        .filter(TicketCol::PaymentId.eq(payment_id))
        .order_by_asc(TicketCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(ticket_from_entity)
        .collect())
}

/// Every payment, newest first, for cashiers and admins.
pub async fn list_payments(
    state: &AppState,
    user: &AuthUser,
    query: PaymentListQuery,
) -> AppResult<ApiResponse<PaymentList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(PaymentCol::Status.eq(status));
    }

    let finder = Payments::find()
        .filter(condition)
        .order_by_desc(PaymentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Payments",
        PaymentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Moves a payment along `pending -> success | failed` or `success -> failed`.
/// Linked tickets follow in the same transaction: a successful payment pays its
/// booked tickets, a failed one cancels them and frees the seats.
pub async fn update_payment_status(
    state: &AppState,
    user: &AuthUser,
    payment_id: Uuid,
    payload: UpdatePaymentStatusRequest,
) -> AppResult<ApiResponse<PaymentWithTickets>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;

    let payment = Payments::find_by_id(payment_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Payment"))?;

    let previous = payment.status;
    let next = payload.status;
    if !previous.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Payment cannot move from {previous:?} to {next:?}"
        )));
    }

    let ticket_status = match next {
        PaymentStatus::Success => Some(TicketStatus::Paid),
        PaymentStatus::Failed => Some(TicketStatus::Cancelled),
        PaymentStatus::Pending => None,
    };

    let mut released: Vec<Uuid> = Vec::new();
    if let Some(ticket_status) = ticket_status {
        let tickets = Tickets::find()
            .filter(TicketCol::PaymentId.eq(payment.id))
            .order_by_asc(TicketCol::Id)
            .lock(LockType::Update)
            .all(&txn)
            .await?;
        let movable: Vec<Uuid> = tickets
            .iter()
            .filter(|t| t.status.can_transition_to(ticket_status))
            .map(|t| t.id)
            .collect();

        if !movable.is_empty() {
            Tickets::update_many()
                .col_expr(TicketCol::Status, Expr::value(ticket_status))
                .col_expr(TicketCol::UpdatedAt, Expr::value(Utc::now()))
                .filter(TicketCol::Id.is_in(movable.iter().copied()))
                .exec(&txn)
                .await?;
        }
        if ticket_status == TicketStatus::Cancelled {
            released = movable;
        }
    }

    let mut active: PaymentActive = payment.into();
    active.status = Set(next);
    let payment = payment_from_entity(active.update(&txn).await?);
    let tickets = linked_tickets(&txn, payment.id).await?;

    txn.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        from = ?previous,
        to = ?next,
        released = released.len(),
        "payment status updated"
    );
    audit_after_commit(
        &state.pool,
        user.user_id,
        "payment_status_updated",
        "payments",
        serde_json::json!({
            "payment_id": payment.id,
            "from": previous,
            "to": next,
            "released_ticket_ids": released,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment updated",
        PaymentWithTickets { payment, tickets },
        Some(Meta::empty()),
    ))
}
