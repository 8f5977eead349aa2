use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::seats::StudioSeats, error::AppResult, response::ApiResponse,
    services::seat_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/seats", get(list_seats))
}

#[utoipa::path(
    get,
    path = "/api/studios/{id}/seats",
    params(("id" = Uuid, Path, description = "Studio ID")),
    responses(
        (status = 200, description = "Seats of the studio in row/number order", body = ApiResponse<StudioSeats>),
        (status = 404, description = "Studio not found"),
    ),
    tag = "Seats"
)]
pub async fn list_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StudioSeats>>> {
    let resp = seat_service::list_seats(&state, id).await?;
    Ok(Json(resp))
}
