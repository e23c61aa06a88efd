mod error;
mod models;
pub mod repositories;

use crate::config;
use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

pub use error::DatabaseError;
pub use models::*;

/// Initialize the database connection pool and run migrations.
pub async fn init_pool() -> Result<PgPool> {
    let config = config::get();
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections.unwrap_or(10))
        .min_connections(config.database.min_connections.unwrap_or(1))
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
