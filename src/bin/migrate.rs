use cinema_booking_api::{config::AppConfig, db::create_orm_conn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    sqlx::migrate!("./migrations")
        .run(orm.get_postgres_connection_pool())
        .await?;
    println!("Migrations applied");
    Ok(())
}
