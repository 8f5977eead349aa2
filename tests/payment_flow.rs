mod common;

use cinema_booking_api::{
    dto::{
        bookings::BookSeatsRequest,
        payments::{PaymentListQuery, SettleRequest, UpdatePaymentStatusRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{PaymentMethod, PaymentStatus, Role, Ticket, TicketStatus},
    routes::params::Pagination,
    services::{booking_service, payment_service, seat_service},
    state::AppState,
};
use common::{BASE_PRICE, create_user, fixture, regular, setup_state, vip};
use uuid::Uuid;

async fn book(state: &AppState, user: &AuthUser, showtime_id: Uuid, seats: &[Uuid]) -> Vec<Ticket> {
    booking_service::book_seats(
        state,
        user,
        BookSeatsRequest {
            showtime_id,
            seat_ids: seats.to_vec(),
        },
    )
    .await
    .expect("booking succeeds")
    .into_data()
    .expect("booking outcome")
    .tickets
}

fn settle_request(tickets: &[Ticket], method: &str, amount: i64) -> SettleRequest {
    SettleRequest {
        ticket_ids: tickets.iter().map(|t| t.id).collect(),
        method: method.to_string(),
        amount,
    }
}

#[tokio::test]
async fn underpayment_changes_nothing() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1"), vip("B1")]).await?;
    let user = create_user(&state, Role::User).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;

    let expected = BASE_PRICE + BASE_PRICE + 20_000;
    let err = payment_service::settle(&state, &user, settle_request(&tickets, "cash", expected - 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientAmount { expected: e, claimed: c } if e == expected && c == expected - 1
    ));

    for ticket in &tickets {
        let reloaded = booking_service::get_ticket(&state, &user, ticket.id)
            .await?
            .into_data()
            .expect("ticket");
        assert_eq!(reloaded.status, TicketStatus::Booked);
        assert_eq!(reloaded.payment_id, None);
    }

    let history = payment_service::payment_history(&state, &user, Pagination::default())
        .await?
        .into_data()
        .expect("history");
    assert!(history.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn settlement_marks_tickets_paid() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1"), regular("A2")]).await?;
    let user = create_user(&state, Role::User).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;

    let settled = payment_service::settle(
        &state,
        &user,
        settle_request(&tickets, "cash", 2 * BASE_PRICE + 5_000),
    )
    .await?
    .into_data()
    .expect("payment");

    let payment = &settled.payment;
    assert_eq!(payment.method, PaymentMethod::Cash);
    assert_eq!(payment.status, PaymentStatus::Success);
    assert_eq!(payment.subtotal, 2 * BASE_PRICE);
    assert_eq!(payment.admin_fee, 0);
    assert_eq!(payment.total_amount, 2 * BASE_PRICE);
    assert_eq!(payment.change_due, 5_000);
    assert!(payment.booking_code.starts_with("BK-"));

    assert_eq!(settled.tickets.len(), 2);
    for ticket in &settled.tickets {
        assert_eq!(ticket.status, TicketStatus::Paid);
        assert_eq!(ticket.payment_id, Some(payment.id));
    }

    // Paid tickets cannot be settled or cancelled again.
    let err = payment_service::settle(
        &state,
        &user,
        settle_request(&tickets, "cash", 2 * BASE_PRICE),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::TicketsNotOwnedOrInvalidState(ids) if ids.len() == 2));
    assert!(booking_service::cancel_ticket(&state, &user, tickets[0].id).await.is_err());

    let fetched = payment_service::get_payment(&state, &user, payment.id)
        .await?
        .into_data()
        .expect("payment");
    assert_eq!(fetched.tickets.len(), 2);

    let history = payment_service::payment_history(&state, &user, Pagination::default())
        .await?
        .into_data()
        .expect("history");
    assert_eq!(history.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn bank_transfer_adds_admin_fee() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![vip("A1")]).await?;
    let user = create_user(&state, Role::User).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;
    let subtotal = BASE_PRICE + 20_000;

    let err = payment_service::settle(&state, &user, settle_request(&tickets, "transfer", subtotal))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientAmount { expected, .. } if expected == subtotal + 2_500));

    let payment = payment_service::settle(
        &state,
        &user,
        settle_request(&tickets, "transfer", subtotal + 2_500),
    )
    .await?
    .into_data()
    .expect("payment")
    .payment;
    assert_eq!(payment.admin_fee, 2_500);
    assert_eq!(payment.total_amount, subtotal + 2_500);
    assert_eq!(payment.change_due, 0);
    Ok(())
}

#[tokio::test]
async fn tickets_of_another_user_are_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1"), regular("A2")]).await?;
    let owner = create_user(&state, Role::User).await?;
    let other = create_user(&state, Role::User).await?;
    let mine = book(&state, &owner, fx.showtime_id, &fx.seats[..1]).await;
    let theirs = book(&state, &other, fx.showtime_id, &fx.seats[1..]).await;

    let mut both = mine.clone();
    both.extend(theirs.iter().cloned());
    let err = payment_service::settle(&state, &owner, settle_request(&both, "cash", 10 * BASE_PRICE))
        .await
        .unwrap_err();
    match err {
        AppError::TicketsNotOwnedOrInvalidState(ids) => assert_eq!(ids, vec![theirs[0].id]),
        other => panic!("unexpected error: {other:?}"),
    }

    let mine = booking_service::get_ticket(&state, &owner, mine[0].id)
        .await?
        .into_data()
        .expect("ticket");
    assert_eq!(mine.status, TicketStatus::Booked);
    Ok(())
}

#[tokio::test]
async fn unknown_method_is_a_bad_request() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1")]).await?;
    let user = create_user(&state, Role::User).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;

    let err = payment_service::settle(&state, &user, settle_request(&tickets, "crypto", 10 * BASE_PRICE))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let missing = SettleRequest {
        ticket_ids: vec![Uuid::new_v4()],
        method: "cash".into(),
        amount: BASE_PRICE,
    };
    let err = payment_service::settle(&state, &user, missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn printing_is_idempotent() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1")]).await?;
    let user = create_user(&state, Role::User).await?;
    let stranger = create_user(&state, Role::User).await?;
    let cashier = create_user(&state, Role::Cashier).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;
    payment_service::settle(&state, &user, settle_request(&tickets, "cash", BASE_PRICE)).await?;

    let err = payment_service::mark_printed(&state, &stranger, tickets[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let first = payment_service::mark_printed(&state, &cashier, tickets[0].id).await?;
    assert_eq!(first.message, "Ticket marked as printed");
    assert!(first.data.expect("ticket").is_printed);

    let second = payment_service::mark_printed(&state, &user, tickets[0].id).await?;
    assert_eq!(second.message, "Ticket already printed");
    assert!(second.data.expect("ticket").is_printed);
    Ok(())
}

fn status_query(status: Option<PaymentStatus>) -> PaymentListQuery {
    PaymentListQuery {
        page: Some(1),
        per_page: Some(100),
        status,
    }
}

#[tokio::test]
async fn staff_list_payments_by_status() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1")]).await?;
    let user = create_user(&state, Role::User).await?;
    let cashier = create_user(&state, Role::Cashier).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;
    let payment = payment_service::settle(&state, &user, settle_request(&tickets, "ovo", BASE_PRICE))
        .await?
        .into_data()
        .expect("payment")
        .payment;

    let err = payment_service::list_payments(&state, &user, status_query(None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let successful = payment_service::list_payments(
        &state,
        &cashier,
        status_query(Some(PaymentStatus::Success)),
    )
    .await?
    .into_data()
    .expect("payments");
    assert!(successful.items.iter().any(|p| p.id == payment.id));
    assert!(successful.items.iter().all(|p| p.status == PaymentStatus::Success));

    let failed = payment_service::list_payments(
        &state,
        &cashier,
        status_query(Some(PaymentStatus::Failed)),
    )
    .await?
    .into_data()
    .expect("payments");
    assert!(failed.items.iter().all(|p| p.id != payment.id));
    Ok(())
}

#[tokio::test]
async fn failed_payment_cancels_its_tickets() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let fx = fixture(&state, vec![regular("A1"), regular("A2")]).await?;
    let user = create_user(&state, Role::User).await?;
    let admin = create_user(&state, Role::Admin).await?;
    let tickets = book(&state, &user, fx.showtime_id, &fx.seats).await;
    let payment = payment_service::settle(
        &state,
        &user,
        settle_request(&tickets, "cash", 2 * BASE_PRICE),
    )
    .await?
    .into_data()
    .expect("payment")
    .payment;

    let failed = UpdatePaymentStatusRequest {
        status: PaymentStatus::Failed,
    };
    let err = payment_service::update_payment_status(&state, &user, payment.id, failed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let updated = payment_service::update_payment_status(
        &state,
        &admin,
        payment.id,
        UpdatePaymentStatusRequest {
            status: PaymentStatus::Failed,
        },
    )
    .await?
    .into_data()
    .expect("payment");
    assert_eq!(updated.payment.status, PaymentStatus::Failed);
    assert_eq!(updated.payment.subtotal, 2 * BASE_PRICE);
    assert_eq!(updated.tickets.len(), 2);
    assert!(updated.tickets.iter().all(|t| t.status == TicketStatus::Cancelled));

    let available = seat_service::available_seats(&state, fx.showtime_id)
        .await?
        .into_data()
        .expect("available seats");
    assert_eq!(available.total_available, 2);

    // Failed is terminal.
    let err = payment_service::update_payment_status(
        &state,
        &admin,
        payment.id,
        UpdatePaymentStatusRequest {
            status: PaymentStatus::Success,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}
