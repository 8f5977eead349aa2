use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::payments::{PaymentList, PaymentWithTickets, SettleRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment_history).post(settle))
        .route("/{id}", get(get_payment))
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = SettleRequest,
    responses(
        (status = 201, description = "Payment recorded and tickets paid", body = ApiResponse<PaymentWithTickets>),
        (status = 400, description = "Unknown payment method or malformed request"),
        (status = 402, description = "Amount below the expected total"),
        (status = 409, description = "Tickets not owned by the payer or not in booked state"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn settle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SettleRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PaymentWithTickets>>)> {
    let resp = payment_service::settle(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/payments",
    params(Pagination),
    responses(
        (status = 200, description = "Payment history of the current user", body = ApiResponse<PaymentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PaymentList>>> {
    let resp = payment_service::payment_history(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Invoice: payment with its tickets", body = ApiResponse<PaymentWithTickets>),
        (status = 404, description = "Payment not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn get_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentWithTickets>>> {
    let resp = payment_service::get_payment(&state, &user, id).await?;
    Ok(Json(resp))
}
