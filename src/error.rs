use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::bookings::SeatRejection,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Seat {0} does not belong to the showtime's studio")]
    SeatNotInStudio(Uuid),

    #[error("All requested seats are unavailable")]
    AllSeatsUnavailable(Vec<SeatRejection>),

    #[error("Tickets are not owned by the payer or cannot be settled")]
    TicketsNotOwnedOrInvalidState(Vec<Uuid>),

    #[error("Insufficient amount: expected {expected}, got {claimed}")]
    InsufficientAmount { expected: i64, claimed: i64 },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::SeatNotInStudio(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AllSeatsUnavailable(_) => StatusCode::CONFLICT,
            AppError::TicketsNotOwnedOrInvalidState(_) => StatusCode::CONFLICT,
            AppError::InsufficientAmount { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::AllSeatsUnavailable(rejections) => {
                Some(serde_json::json!({ "rejected": rejections }))
            }
            AppError::TicketsNotOwnedOrInvalidState(ids) => {
                Some(serde_json::json!({ "ticket_ids": ids }))
            }
            AppError::InsufficientAmount { expected, claimed } => Some(serde_json::json!({
                "expected_total": expected,
                "claimed_amount": claimed,
            })),
            AppError::SeatNotInStudio(seat_id) => Some(serde_json::json!({ "seat_id": seat_id })),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::DbError(err) => tracing::error!(error = %err, "database error"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
            AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
            _ => {}
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
                details: self.details(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
