use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod app_state;
mod config;
mod db;
mod error;
mod middleware;
mod modules;
mod scheduling;
mod services;

use app_state::AppState;
use services::{AvailabilityService, BookingService, NotificationService, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init()?.clone();
    let pool = db::init_pool().await?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let notifications = Arc::new(NotificationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        env.schedule.clone(),
    ));
    let booking = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        notifications.clone(),
    ));
    let availability = Arc::new(AvailabilityService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));

    let state = AppState::new(
        pool,
        env.clone(),
        booking,
        availability,
        notifications,
        store,
    );
    let app = app::create_router(state);

    let addr = env.server_addr();
    info!("salon-backend listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
