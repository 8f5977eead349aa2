use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        bookings::{
            BookSeatsRequest, BookingOutcome, RejectionReason, ReleasedBookings, SeatRejection,
            TicketList,
        },
        payments::{
            PaymentList, PaymentListQuery, PaymentWithTickets, SettleRequest,
            UpdatePaymentStatusRequest,
        },
        seats::{AvailableSeat, AvailableSeats, SeatList, StudioSeats, UpdateSeatStatusRequest},
    },
    models::{
        Payment, PaymentMethod, PaymentStatus, Seat, SeatStatus, SeatType, Showtime, Studio,
        Ticket, TicketStatus,
    },
    response::{ApiResponse, Meta},
    routes::{admin, health, params, payments, showtimes, studios, tickets},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        studios::list_seats,
        showtimes::available_seats,
        showtimes::booked_seats,
        tickets::book_tickets,
        tickets::list_tickets,
        tickets::get_ticket,
        tickets::cancel_ticket,
        tickets::mark_printed,
        payments::settle,
        payments::payment_history,
        payments::get_payment,
        admin::update_seat_status,
        admin::release_expired,
        admin::list_payments,
        admin::update_payment_status
    ),
    components(
        schemas(
            Studio,
            Seat,
            SeatType,
            SeatStatus,
            Showtime,
            Ticket,
            TicketStatus,
            Payment,
            PaymentMethod,
            PaymentStatus,
            StudioSeats,
            SeatList,
            AvailableSeat,
            AvailableSeats,
            UpdateSeatStatusRequest,
            BookSeatsRequest,
            BookingOutcome,
            SeatRejection,
            RejectionReason,
            TicketList,
            ReleasedBookings,
            SettleRequest,
            PaymentWithTickets,
            PaymentList,
            PaymentListQuery,
            UpdatePaymentStatusRequest,
            params::Pagination,
            Meta,
            ApiResponse<BookingOutcome>,
            ApiResponse<PaymentWithTickets>,
            ApiResponse<AvailableSeats>,
            ApiResponse<TicketList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Seats", description = "Seat inventory and availability"),
        (name = "Tickets", description = "Seat booking and ticket lifecycle"),
        (name = "Payments", description = "Payment settlement"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
