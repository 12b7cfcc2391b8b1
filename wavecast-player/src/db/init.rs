//! Database initialization

use crate::error::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create all tables if they do not exist
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS history (
            position INTEGER PRIMARY KEY,
            track_id TEXT NOT NULL,
            played_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS likes (
            track_id TEXT PRIMARY KEY,
            count INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            guid TEXT PRIMARY KEY,
            track_id TEXT NOT NULL,
            rating INTEGER NOT NULL,
            comment TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            guid TEXT PRIMARY KEY,
            author TEXT NOT NULL,
            text TEXT NOT NULL,
            is_ai INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dedications (
            guid TEXT PRIMARY KEY,
            words TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS calendar_entries (
            guid TEXT PRIMARY KEY,
            entry_date TEXT NOT NULL,
            machine TEXT NOT NULL,
            entry_type TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize settings with default values when missing
pub async fn init_settings_defaults(pool: &SqlitePool) -> Result<()> {
    let defaults = vec![("volume_level", "0.5")];

    for (key, default_value) in defaults {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
                .bind(key)
                .fetch_one(pool)
                .await?;

        if !exists {
            sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(default_value)
                .execute(pool)
                .await?;
            info!("Initialized setting '{}' = {}", key, default_value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::db;

    #[tokio::test]
    async fn test_tables_and_defaults_created() {
        let pool = db::connect_in_memory().await.unwrap();
        let volume = db::settings::get_setting(&pool, "volume_level")
            .await
            .unwrap();
        assert_eq!(volume.as_deref(), Some("0.5"));
    }
}
