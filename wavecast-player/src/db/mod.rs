//! SQLite persistence
//!
//! Durable client-side state: play history, likes, reviews, chat/dedication
//! fallback storage, calendar entries and settings.

pub mod calendar;
pub mod history;
pub mod init;
pub mod ratings;
pub mod settings;
pub mod social;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (or create) the database under the data folder and initialize the
/// schema
pub async fn connect(data_dir: &Path) -> Result<SqlitePool> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("wavecast.db");
    info!("Opening database {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    init::create_tables(&pool).await?;
    init::init_settings_defaults(&pool).await?;
    Ok(pool)
}

/// In-memory database for tests
pub async fn connect_in_memory() -> Result<SqlitePool> {
    // A pooled in-memory database must stay on one connection or each
    // checkout would see a different empty database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init::create_tables(&pool).await?;
    init::init_settings_defaults(&pool).await?;
    Ok(pool)
}
