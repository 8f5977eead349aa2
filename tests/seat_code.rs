use std::collections::HashSet;

use cinema_booking_api::{
    dto::bookings::RejectionReason,
    models::{PaymentStatus, Role, Seat, SeatStatus, SeatType, TicketStatus},
    seat_code::{SeatCode, sort_by_seat_code},
    services::{booking_service::partition_seats, dedupe_ids},
};
use uuid::Uuid;

#[test]
fn seat_codes_sort_by_row_then_number() {
    let mut codes = vec!["B1", "A10", "AA1", "A2", "Z3", "??", "a1"];
    sort_by_seat_code(&mut codes, |c| c);
    assert_eq!(codes, vec!["a1", "A2", "A10", "B1", "Z3", "AA1", "??"]);
}

#[test]
fn malformed_codes_are_kept_raw() {
    assert_eq!(
        SeatCode::parse("C12"),
        SeatCode::Parsed {
            row: "C".into(),
            number: 12
        }
    );
    assert_eq!(SeatCode::parse("12C"), SeatCode::Raw("12C".into()));
    assert_eq!(SeatCode::parse("VIP"), SeatCode::Raw("VIP".into()));
    assert!(SeatCode::parse("Z99") < SeatCode::parse("VIP"));
}

fn seat(code: &str, status: SeatStatus) -> Seat {
    Seat {
        id: Uuid::new_v4(),
        studio_id: Uuid::nil(),
        seat_code: code.to_string(),
        seat_type: SeatType::Regular,
        status,
    }
}

#[test]
fn partition_rejects_booked_and_maintenance_seats() {
    let free = seat("A1", SeatStatus::Available);
    let taken = seat("A2", SeatStatus::Available);
    let broken = seat("A3", SeatStatus::Maintenance);
    // Booked wins over maintenance when both apply.
    let both = seat("A4", SeatStatus::Maintenance);
    let booked = HashSet::from([taken.id, both.id]);

    let partition = partition_seats(
        vec![free.clone(), taken.clone(), broken.clone(), both.clone()],
        &booked,
    );

    assert_eq!(partition.free, vec![free]);
    let reasons: Vec<_> = partition
        .rejected
        .iter()
        .map(|r| (r.seat_id, r.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (taken.id, RejectionReason::AlreadyBooked),
            (broken.id, RejectionReason::UnderMaintenance),
            (both.id, RejectionReason::AlreadyBooked),
        ]
    );
}

#[test]
fn dedupe_keeps_first_occurrence_order() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert_eq!(dedupe_ids(&[b, a, b, a, a]), vec![b, a]);
    assert!(dedupe_ids(&[]).is_empty());
}

#[test]
fn ticket_status_transitions() {
    assert!(TicketStatus::Booked.can_transition_to(TicketStatus::Paid));
    assert!(TicketStatus::Booked.can_transition_to(TicketStatus::Cancelled));
    assert!(TicketStatus::Paid.can_transition_to(TicketStatus::Cancelled));
    assert!(!TicketStatus::Paid.can_transition_to(TicketStatus::Booked));
    assert!(!TicketStatus::Cancelled.can_transition_to(TicketStatus::Booked));

    assert!(TicketStatus::Booked.holds_seat());
    assert!(TicketStatus::Paid.holds_seat());
    assert!(!TicketStatus::Cancelled.holds_seat());
    assert_eq!(
        TicketStatus::seat_holding(),
        vec![TicketStatus::Booked, TicketStatus::Paid]
    );
}

#[test]
fn payment_status_transitions() {
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Success));
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
    assert!(PaymentStatus::Success.can_transition_to(PaymentStatus::Failed));
    assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Success));
    assert!(!PaymentStatus::Success.can_transition_to(PaymentStatus::Success));
    assert!(!PaymentStatus::Success.can_transition_to(PaymentStatus::Pending));
}

#[test]
fn roles_parse_from_stored_text() {
    assert_eq!("cashier".parse::<Role>(), Ok(Role::Cashier));
    let err = "owner".parse::<Role>().unwrap_err();
    assert_eq!(err.to_string(), "unknown role `owner`");
}
