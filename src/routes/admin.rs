use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        bookings::ReleasedBookings,
        payments::{PaymentList, PaymentListQuery, PaymentWithTickets, UpdatePaymentStatusRequest},
        seats::UpdateSeatStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Seat,
    response::ApiResponse,
    services::{booking_service, payment_service, seat_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seats/{id}/status", put(update_seat_status))
        .route("/tickets/release-expired", post(release_expired))
        .route("/payments", get(list_payments))
        .route("/payments/{id}/status", patch(update_payment_status))
}

#[utoipa::path(
    put,
    path = "/api/admin/seats/{id}/status",
    params(("id" = Uuid, Path, description = "Seat ID")),
    request_body = UpdateSeatStatusRequest,
    responses(
        (status = 200, description = "Seat status updated", body = ApiResponse<Seat>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Seat not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_seat_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSeatStatusRequest>,
) -> AppResult<Json<ApiResponse<Seat>>> {
    let resp = seat_service::set_seat_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/tickets/release-expired",
    responses(
        (status = 200, description = "Booked tickets past the hold window cancelled", body = ApiResponse<ReleasedBookings>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn release_expired(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReleasedBookings>>> {
    let resp = booking_service::release_expired_bookings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/payments",
    params(PaymentListQuery),
    responses(
        (status = 200, description = "All payments, newest first (cashier or admin)", body = ApiResponse<PaymentList>),
        (status = 400, description = "Unknown status filter"),
        (status = 403, description = "Staff only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PaymentListQuery>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::list_payments(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/payments/{id}/status",
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated; a failed payment releases its tickets", body = ApiResponse<PaymentWithTickets>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<PaymentWithTickets>>> {
    let resp = payment_service::update_payment_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
