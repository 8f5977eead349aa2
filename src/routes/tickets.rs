use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::bookings::{BookSeatsRequest, BookingOutcome, TicketList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Ticket,
    response::ApiResponse,
    routes::params::Pagination,
    services::{booking_service, payment_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickets).post(book_tickets))
        .route("/{id}", get(get_ticket))
        .route("/{id}/cancel", post(cancel_ticket))
        .route("/{id}/print", post(mark_printed))
}

#[utoipa::path(
    post,
    path = "/api/tickets",
    request_body = BookSeatsRequest,
    responses(
        (status = 201, description = "Seats reserved; unavailable seats are listed in `rejected`", body = ApiResponse<BookingOutcome>),
        (status = 400, description = "Empty seat list"),
        (status = 404, description = "Showtime or seat not found"),
        (status = 409, description = "Every requested seat is unavailable"),
        (status = 422, description = "Seat does not belong to the showtime's studio"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn book_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BookSeatsRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookingOutcome>>)> {
    let resp = booking_service::book_seats(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/tickets",
    params(Pagination),
    responses(
        (status = 200, description = "Tickets of the current user", body = ApiResponse<TicketList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn list_tickets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TicketList>>> {
    let resp = booking_service::list_user_tickets(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{id}",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket", body = ApiResponse<Ticket>),
        (status = 404, description = "Ticket not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = booking_service::get_ticket(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/cancel",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket cancelled, seat released", body = ApiResponse<Ticket>),
        (status = 400, description = "Ticket is not booked"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn cancel_ticket(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = booking_service::cancel_ticket(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tickets/{id}/print",
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket flagged as printed", body = ApiResponse<Ticket>),
        (status = 403, description = "Ticket belongs to someone else"),
        (status = 404, description = "Ticket not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Tickets"
)]
pub async fn mark_printed(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Ticket>>> {
    let resp = payment_service::mark_printed(&state, &user, id).await?;
    Ok(Json(resp))
}
