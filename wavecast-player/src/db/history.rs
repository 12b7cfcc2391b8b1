//! Recently-played history persistence
//!
//! The bounded history list is written through after every mutation and
//! restored at startup, so repeat avoidance survives restarts.

use crate::error::Result;
use sqlx::SqlitePool;

/// Replace the stored history with the given list (most-recent-first)
pub async fn save(pool: &SqlitePool, history: &[String]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM history").execute(&mut *tx).await?;

    let now = chrono::Utc::now().to_rfc3339();
    for (position, track_id) in history.iter().enumerate() {
        sqlx::query("INSERT INTO history (position, track_id, played_at) VALUES (?, ?, ?)")
            .bind(position as i64)
            .bind(track_id)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Load the stored history, most-recent-first
pub async fn load(pool: &SqlitePool, limit: usize) -> Result<Vec<String>> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT track_id FROM history ORDER BY position ASC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}
