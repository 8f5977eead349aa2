use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use cinema_booking_api::{
    config::parse_holidays,
    models::{PaymentMethod, Seat, SeatStatus, SeatType, Showtime},
    pricing::{Charge, DayTier, FlatPricing, PriceTiers, PricingStrategy, TieredPricing},
};
use sea_orm::{ActiveEnum, Iterable};
use uuid::Uuid;

fn showtime(studio_id: Uuid, date: NaiveDate) -> Showtime {
    Showtime {
        id: Uuid::new_v4(),
        film_id: Uuid::new_v4(),
        studio_id,
        show_date: date,
        show_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        price: 50_000,
    }
}

fn seat(studio_id: Uuid, code: &str, seat_type: SeatType) -> Seat {
    Seat {
        id: Uuid::new_v4(),
        studio_id,
        seat_code: code.to_string(),
        seat_type,
        status: SeatStatus::Available,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn flat_pricing_adds_vip_surcharge() {
    let studio = Uuid::new_v4();
    let show = showtime(studio, date(2026, 10, 21));

    assert_eq!(FlatPricing.quote(&show, &seat(studio, "C4", SeatType::Regular)), 50_000);
    assert_eq!(FlatPricing.quote(&show, &seat(studio, "A1", SeatType::Vip)), 70_000);
}

fn tiered() -> (Uuid, TieredPricing) {
    let studio = Uuid::new_v4();
    let tables = HashMap::from([(
        studio,
        PriceTiers {
            weekday: 40_000,
            weekend: 55_000,
            holiday: 65_000,
        },
    )]);
    let holidays = HashSet::from([date(2026, 12, 25)]);
    (studio, TieredPricing::new(tables, holidays))
}

#[test]
fn tiered_pricing_follows_day_of_week() {
    let (studio, pricing) = tiered();
    let regular = seat(studio, "D1", SeatType::Regular);

    // 2026-10-21 is a Wednesday, 2026-10-24 a Saturday.
    assert_eq!(pricing.day_tier(date(2026, 10, 21)), DayTier::Weekday);
    assert_eq!(pricing.day_tier(date(2026, 10, 24)), DayTier::Weekend);
    assert_eq!(pricing.quote(&showtime(studio, date(2026, 10, 21)), &regular), 40_000);
    assert_eq!(pricing.quote(&showtime(studio, date(2026, 10, 25)), &regular), 55_000);
}

#[test]
fn tiered_pricing_prefers_holiday_over_weekday() {
    let (studio, pricing) = tiered();
    // Christmas 2026 falls on a Friday.
    let christmas = showtime(studio, date(2026, 12, 25));

    assert_eq!(pricing.day_tier(christmas.show_date), DayTier::Holiday);
    assert_eq!(pricing.quote(&christmas, &seat(studio, "D1", SeatType::Regular)), 65_000);
    assert_eq!(pricing.quote(&christmas, &seat(studio, "A1", SeatType::Vip)), 85_000);
}

#[test]
fn tiered_pricing_falls_back_to_showtime_price() {
    let (_, pricing) = tiered();
    let other_studio = Uuid::new_v4();
    let show = showtime(other_studio, date(2026, 10, 24));

    assert_eq!(pricing.quote(&show, &seat(other_studio, "B2", SeatType::Regular)), 50_000);
    assert_eq!(pricing.quote(&show, &seat(other_studio, "A2", SeatType::Vip)), 70_000);
}

#[test]
fn admin_fee_per_method() {
    let expected = [
        ("cash", 0),
        ("transfer", 2_500),
        ("gopay", 0),
        ("dana", 0),
        ("ovo", 0),
        ("bca", 2_500),
        ("mandiri", 2_500),
    ];
    for (name, fee) in expected {
        let method: PaymentMethod = name.parse().unwrap();
        assert_eq!(method.admin_fee(), fee, "fee for {name}");
        assert_eq!(method.to_value(), name);
    }
    assert_eq!(PaymentMethod::iter().count(), expected.len());
}

#[test]
fn unknown_payment_method_is_rejected() {
    let err = "bitcoin".parse::<PaymentMethod>().unwrap_err();
    assert_eq!(err.value, "bitcoin");
    assert_eq!(err.to_string(), "unknown payment method `bitcoin`");
    assert!("Cash".parse::<PaymentMethod>().is_err());
}

#[test]
fn charge_sums_quotes_and_adds_fee() {
    let charge = Charge::compute([50_000, 70_000], PaymentMethod::Bca);
    assert_eq!(charge.subtotal, 120_000);
    assert_eq!(charge.admin_fee, 2_500);
    assert_eq!(charge.total, 122_500);

    let cash = Charge::compute([50_000], PaymentMethod::Cash);
    assert_eq!(cash.total, 50_000);
}

#[test]
fn holidays_parse_from_comma_list() {
    let parsed = parse_holidays(" 2026-12-25, 2027-01-01 ,").unwrap();
    assert_eq!(parsed, HashSet::from([date(2026, 12, 25), date(2027, 1, 1)]));

    assert!(parse_holidays("").unwrap().is_empty());
    assert!(parse_holidays("25/12/2026").is_err());
}
