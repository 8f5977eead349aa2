use chrono::{Duration, NaiveTime, Utc};
use cinema_booking_api::{
    config::AppConfig,
    db::create_orm_conn,
    entity::{
        films::ActiveModel as FilmActive,
        seats::ActiveModel as SeatActive,
        showtimes::ActiveModel as ShowtimeActive,
        studios::{ActiveModel as StudioActive, Column as StudioCol, Entity as Studios},
        ticket_prices::ActiveModel as TicketPriceActive,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::{Role, SeatStatus, SeatType},
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

const DEMO_STUDIO: &str = "Studio 1";
const ROWS: [&str; 5] = ["A", "B", "C", "D", "E"];
const SEATS_PER_ROW: u32 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations")
        .run(orm.get_postgres_connection_pool())
        .await?;

    let admin_id = ensure_user(&orm, "admin@example.com", Role::Admin).await?;
    let cashier_id = ensure_user(&orm, "cashier@example.com", Role::Cashier).await?;
    let user_id = ensure_user(&orm, "user@example.com", Role::User).await?;
    seed_studio(&orm).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Cashier ID: {cashier_id}, User ID: {user_id}"
    );
    Ok(())
}

async fn ensure_user(orm: &DatabaseConnection, email: &str, role: Role) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        role: Set(role),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role:?})");
    Ok(user.id)
}

async fn seed_studio(orm: &DatabaseConnection) -> anyhow::Result<()> {
    if Studios::find()
        .filter(StudioCol::Name.eq(DEMO_STUDIO))
        .one(orm)
        .await?
        .is_some()
    {
        println!("Demo studio already present");
        return Ok(());
    }

    let studio = StudioActive {
        id: Set(Uuid::new_v4()),
        name: Set(DEMO_STUDIO.to_string()),
        capacity: Set((ROWS.len() as u32 * SEATS_PER_ROW) as i32),
        description: Set(Some("Demo auditorium".into())),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    // Front two rows are VIP.
    for (row_index, row) in ROWS.iter().enumerate() {
        let seat_type = if row_index < 2 { SeatType::Vip } else { SeatType::Regular };
        for number in 1..=SEATS_PER_ROW {
            SeatActive {
                id: Set(Uuid::new_v4()),
                studio_id: Set(studio.id),
                seat_code: Set(format!("{row}{number}")),
                seat_type: Set(seat_type),
                status: Set(SeatStatus::Available),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
        }
    }

    let film = FilmActive {
        id: Set(Uuid::new_v4()),
        title: Set("Ferris and the Borrow Checker".into()),
        genre: Set("Adventure".into()),
        duration_minutes: Set(112),
        rating: Set(8.4),
        release_date: Set(Some(Utc::now().date_naive())),
        synopsis: Set(Some("A crab learns to share.".into())),
        status: Set("playing".into()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    let tomorrow = Utc::now().date_naive() + Duration::days(1);
    for hour in [13, 16, 19] {
        ShowtimeActive {
            id: Set(Uuid::new_v4()),
            film_id: Set(film.id),
            studio_id: Set(studio.id),
            show_date: Set(tomorrow),
            show_time: Set(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()),
            price: Set(50_000),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    TicketPriceActive {
        id: Set(Uuid::new_v4()),
        studio_id: Set(studio.id),
        weekday_price: Set(45_000),
        weekend_price: Set(55_000),
        holiday_price: Set(65_000),
        is_active: Set(true),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Seeded studio, seats, film and showtimes");
    Ok(())
}
