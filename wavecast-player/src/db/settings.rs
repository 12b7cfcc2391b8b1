//! Settings table access

use crate::error::Result;
use sqlx::SqlitePool;

/// Read a setting value
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

/// Write a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Persisted user volume, if present and parseable
pub async fn get_volume(pool: &SqlitePool) -> Result<Option<f32>> {
    Ok(get_setting(pool, "volume_level")
        .await?
        .and_then(|v| v.parse::<f32>().ok()))
}

/// Persist the user volume
pub async fn set_volume(pool: &SqlitePool, volume: f32) -> Result<()> {
    set_setting(pool, "volume_level", &volume.to_string()).await
}
