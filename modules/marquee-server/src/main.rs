use anyhow::Result;
use tracing_subscriber::EnvFilter;

use marquee_common::{Config, VenueClock};
use marquee_server::routes::{self, AppState};
use marquee_server::store::{BoardSettings, RotationStore, ScheduleStore, SettingsStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting marquee-server");

    let config = Config::from_env();
    let clock = VenueClock::from_name(&config.venue_timezone)?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    let defaults = BoardSettings {
        lead_minutes: config.default_lead_minutes,
        rotate_every_seconds: config.default_rotate_seconds,
    };

    let state = AppState {
        clock,
        schedule: ScheduleStore::new(pool.clone()),
        rotation: RotationStore::new(pool.clone()),
        settings: SettingsStore::new(pool, defaults),
    };

    let addr = format!("{}:{}", config.web_host, config.web_port);
    tracing::info!(addr = %addr, timezone = %config.venue_timezone, "Status board listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, routes::build_router(state)).await?;

    Ok(())
}
