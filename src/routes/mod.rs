use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod doc;
pub mod health;
pub mod params;
pub mod payments;
pub mod showtimes;
pub mod studios;
pub mod tickets;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/studios", studios::router())
        .nest("/showtimes", showtimes::router())
        .nest("/tickets", tickets::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}
