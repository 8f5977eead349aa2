#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use cinema_booking_api::{
    db::create_orm_conn,
    entity::{
        films::ActiveModel as FilmActive, seats::ActiveModel as SeatActive,
        showtimes::ActiveModel as ShowtimeActive, studios::ActiveModel as StudioActive,
        users::ActiveModel as UserActive,
    },
    middleware::auth::AuthUser,
    models::{Role, SeatStatus, SeatType},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const BASE_PRICE: i64 = 50_000;

/// Connects to the test database, or returns `None` when none is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run DB tests.");
            return Ok(None);
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    sqlx::migrate!("./migrations")
        .run(orm.get_postgres_connection_pool())
        .await?;
    Ok(Some(AppState::with_flat_pricing(orm)))
}

pub async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    UserActive {
        id: Set(id),
        email: Set(format!("{:?}-{}@example.com", role, id.simple()).to_lowercase()),
        role: Set(role),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser { user_id: id, role })
}

/// A fresh studio with one showtime. Every test gets its own rows so tests
/// can share a database.
pub struct Fixture {
    pub studio_id: Uuid,
    pub showtime_id: Uuid,
    /// Seat ids in the order they were passed to [`fixture`].
    pub seats: Vec<Uuid>,
}

pub struct SeatDef {
    pub code: &'static str,
    pub seat_type: SeatType,
    pub status: SeatStatus,
}

pub fn regular(code: &'static str) -> SeatDef {
    SeatDef {
        code,
        seat_type: SeatType::Regular,
        status: SeatStatus::Available,
    }
}

pub fn vip(code: &'static str) -> SeatDef {
    SeatDef {
        code,
        seat_type: SeatType::Vip,
        status: SeatStatus::Available,
    }
}

pub fn broken(code: &'static str) -> SeatDef {
    SeatDef {
        code,
        seat_type: SeatType::Regular,
        status: SeatStatus::Maintenance,
    }
}

pub async fn fixture(state: &AppState, seats: Vec<SeatDef>) -> anyhow::Result<Fixture> {
    let studio_id = Uuid::new_v4();
    StudioActive {
        id: Set(studio_id),
        name: Set(format!("Studio {}", studio_id.simple())),
        capacity: Set(seats.len() as i32),
        description: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let mut seat_ids = Vec::with_capacity(seats.len());
    for def in seats {
        let id = Uuid::new_v4();
        SeatActive {
            id: Set(id),
            studio_id: Set(studio_id),
            seat_code: Set(def.code.to_string()),
            seat_type: Set(def.seat_type),
            status: Set(def.status),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
        seat_ids.push(id);
    }

    let film_id = Uuid::new_v4();
    FilmActive {
        id: Set(film_id),
        title: Set("Test Film".into()),
        genre: Set("Drama".into()),
        duration_minutes: Set(100),
        rating: Set(7.0),
        release_date: Set(None),
        synopsis: Set(None),
        status: Set("playing".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let showtime_id = Uuid::new_v4();
    ShowtimeActive {
        id: Set(showtime_id),
        film_id: Set(film_id),
        studio_id: Set(studio_id),
        show_date: Set(NaiveDate::from_ymd_opt(2026, 10, 21).expect("valid date")),
        show_time: Set(NaiveTime::from_hms_opt(19, 0, 0).expect("valid time")),
        price: Set(BASE_PRICE),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(Fixture {
        studio_id,
        showtime_id,
        seats: seat_ids,
    })
}
