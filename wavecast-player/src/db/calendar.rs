//! Maintenance-scheduling calendar
//!
//! A date-keyed note store: each entry marks a machine and an entry type on
//! a calendar day. Plain CRUD, no concurrency concerns.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Default machine roster offered by the scheduling UI
pub const MACHINES: [&str; 5] = [
    "CNC Alpha",
    "Laser Cutter Pro",
    "Assembly Line 3",
    "Packaging Bot X",
    "Welding Station Omega",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub guid: String,
    /// Day the entry is keyed on, "YYYY-MM-DD"
    pub date: String,
    pub machine: String,
    pub entry_type: String,
    pub created_at: DateTime<Utc>,
}

/// Add an entry for a day. The date must be "YYYY-MM-DD"; machine and
/// entry type must be non-empty.
pub async fn add_entry(
    pool: &SqlitePool,
    date: &str,
    machine: &str,
    entry_type: &str,
) -> Result<CalendarEntry> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::Validation(format!("invalid date '{}', expected YYYY-MM-DD", date)))?;
    let machine = machine.trim();
    let entry_type = entry_type.trim();
    if machine.is_empty() || entry_type.is_empty() {
        return Err(Error::Validation(
            "machine and entry type are required".to_string(),
        ));
    }

    let entry = CalendarEntry {
        guid: Uuid::new_v4().to_string(),
        date: parsed.format("%Y-%m-%d").to_string(),
        machine: machine.to_string(),
        entry_type: entry_type.to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO calendar_entries (guid, entry_date, machine, entry_type, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&entry.guid)
    .bind(&entry.date)
    .bind(&entry.machine)
    .bind(&entry.entry_type)
    .bind(entry.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(entry)
}

/// All entries within a month, ordered by day
pub async fn entries_for_month(
    pool: &SqlitePool,
    year: i32,
    month: u32,
) -> Result<Vec<CalendarEntry>> {
    if !(1..=12).contains(&month) {
        return Err(Error::Validation(format!("invalid month {}", month)));
    }
    let prefix = format!("{:04}-{:02}-%", year, month);
    let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
        "SELECT guid, entry_date, machine, entry_type, created_at
         FROM calendar_entries WHERE entry_date LIKE ? ORDER BY entry_date ASC",
    )
    .bind(prefix)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_entry).collect())
}

/// All entries on one day
pub async fn entries_for_date(pool: &SqlitePool, date: &str) -> Result<Vec<CalendarEntry>> {
    let rows: Vec<(String, String, String, String, String)> = sqlx::query_as(
        "SELECT guid, entry_date, machine, entry_type, created_at
         FROM calendar_entries WHERE entry_date = ? ORDER BY created_at ASC",
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_entry).collect())
}

fn row_to_entry(row: (String, String, String, String, String)) -> CalendarEntry {
    let (guid, date, machine, entry_type, created_at) = row;
    CalendarEntry {
        guid,
        date,
        machine,
        entry_type,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_add_and_query_by_month() {
        let pool = db::connect_in_memory().await.unwrap();
        add_entry(&pool, "2026-03-05", "CNC Alpha", "inspection")
            .await
            .unwrap();
        add_entry(&pool, "2026-03-12", "Laser Cutter Pro", "evacuation")
            .await
            .unwrap();
        add_entry(&pool, "2026-04-01", "CNC Alpha", "inspection")
            .await
            .unwrap();

        let march = entries_for_month(&pool, 2026, 3).await.unwrap();
        assert_eq!(march.len(), 2);
        assert_eq!(march[0].date, "2026-03-05");

        let day = entries_for_date(&pool, "2026-03-12").await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].machine, "Laser Cutter Pro");
    }

    #[tokio::test]
    async fn test_validation() {
        let pool = db::connect_in_memory().await.unwrap();
        assert!(add_entry(&pool, "tomorrow", "CNC Alpha", "inspection")
            .await
            .is_err());
        assert!(add_entry(&pool, "2026-03-05", "  ", "inspection")
            .await
            .is_err());
        assert!(entries_for_month(&pool, 2026, 13).await.is_err());
    }
}
