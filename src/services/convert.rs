use chrono::Utc;

use crate::{
    entity::{
        payments::Model as PaymentModel, seats::Model as SeatModel,
        showtimes::Model as ShowtimeModel, studios::Model as StudioModel,
        tickets::Model as TicketModel,
    },
    models::{Payment, Seat, Showtime, Studio, Ticket},
};

pub fn studio_from_entity(model: StudioModel) -> Studio {
    Studio {
        id: model.id,
        name: model.name,
        capacity: model.capacity,
        description: model.description,
    }
}

pub fn seat_from_entity(model: SeatModel) -> Seat {
    Seat {
        id: model.id,
        studio_id: model.studio_id,
        seat_code: model.seat_code,
        seat_type: model.seat_type,
        status: model.status,
    }
}

pub fn showtime_from_entity(model: ShowtimeModel) -> Showtime {
    Showtime {
        id: model.id,
        film_id: model.film_id,
        studio_id: model.studio_id,
        show_date: model.show_date,
        show_time: model.show_time,
        price: model.price,
    }
}

pub fn ticket_from_entity(model: TicketModel) -> Ticket {
    Ticket {
        id: model.id,
        showtime_id: model.showtime_id,
        seat_id: model.seat_id,
        user_id: model.user_id,
        status: model.status,
        price: model.price,
        booking_code: model.booking_code,
        payment_id: model.payment_id,
        is_printed: model.is_printed,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub fn payment_from_entity(model: PaymentModel) -> Payment {
    Payment {
        id: model.id,
        user_id: model.user_id,
        booking_code: model.booking_code,
        subtotal: model.subtotal,
        admin_fee: model.admin_fee,
        total_amount: model.total_amount,
        amount_paid: model.amount_paid,
        change_due: model.change_due,
        method: model.method,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
