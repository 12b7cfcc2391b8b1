//! Likes and reviews
//!
//! Write-through in-memory caches over the likes/reviews tables. Average
//! ratings feed back into the weighted selector, so reads must be cheap.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A single listener review
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A top-rated list entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedTrack {
    pub track_id: String,
    pub average_rating: f64,
    pub review_count: usize,
}

pub struct RatingsStore {
    db: SqlitePool,
    likes: RwLock<HashMap<String, i64>>,
    reviews: RwLock<HashMap<String, Vec<Review>>>,
}

impl RatingsStore {
    /// Load the caches from the database
    pub async fn load(db: SqlitePool) -> Result<Self> {
        let like_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT track_id, count FROM likes")
                .fetch_all(&db)
                .await?;
        let likes: HashMap<String, i64> = like_rows.into_iter().collect();

        let review_rows: Vec<(String, i64, String, String)> = sqlx::query_as(
            "SELECT track_id, rating, comment, created_at FROM reviews ORDER BY created_at ASC",
        )
        .fetch_all(&db)
        .await?;

        let mut reviews: HashMap<String, Vec<Review>> = HashMap::new();
        for (track_id, rating, comment, created_at) in review_rows {
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            reviews.entry(track_id).or_default().push(Review {
                rating: rating.clamp(1, 5) as u8,
                comment,
                created_at,
            });
        }

        Ok(Self {
            db,
            likes: RwLock::new(likes),
            reviews: RwLock::new(reviews),
        })
    }

    /// Record one like for a track; returns the new count
    pub async fn like(&self, track_id: &str) -> Result<i64> {
        sqlx::query(
            "INSERT INTO likes (track_id, count) VALUES (?, 1)
             ON CONFLICT(track_id) DO UPDATE SET count = count + 1",
        )
        .bind(track_id)
        .execute(&self.db)
        .await?;

        let mut likes = self.likes.write().await;
        let count = likes.entry(track_id.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    /// Like count for a track
    pub async fn likes_for(&self, track_id: &str) -> i64 {
        self.likes.read().await.get(track_id).copied().unwrap_or(0)
    }

    /// Number of distinct tracks with at least one like
    pub async fn liked_track_count(&self) -> usize {
        self.likes.read().await.len()
    }

    /// Add a review. Rating must be 1-5.
    pub async fn add_review(&self, track_id: &str, rating: u8, comment: &str) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(Error::Validation(format!(
                "rating must be between 1 and 5, got {}",
                rating
            )));
        }

        let review = Review {
            rating,
            comment: comment.trim().to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO reviews (guid, track_id, rating, comment, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(track_id)
        .bind(rating as i64)
        .bind(&review.comment)
        .bind(review.created_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        self.reviews
            .write()
            .await
            .entry(track_id.to_string())
            .or_default()
            .push(review.clone());
        Ok(review)
    }

    /// Reviews for a track, oldest first
    pub async fn reviews_for(&self, track_id: &str) -> Vec<Review> {
        self.reviews
            .read()
            .await
            .get(track_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Average rating for a track (0 when unreviewed)
    pub async fn average_rating(&self, track_id: &str) -> f64 {
        let reviews = self.reviews.read().await;
        average(reviews.get(track_id))
    }

    /// Average ratings for every reviewed track
    pub async fn average_ratings(&self) -> HashMap<String, f64> {
        let reviews = self.reviews.read().await;
        reviews
            .iter()
            .map(|(id, list)| (id.clone(), average(Some(list))))
            .collect()
    }

    /// Highest-rated tracks, best first
    pub async fn top_rated(&self, limit: usize) -> Vec<RatedTrack> {
        let reviews = self.reviews.read().await;
        let mut rated: Vec<RatedTrack> = reviews
            .iter()
            .map(|(id, list)| RatedTrack {
                track_id: id.clone(),
                average_rating: average(Some(list)),
                review_count: list.len(),
            })
            .collect();
        rated.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rated.truncate(limit);
        rated
    }
}

fn average(reviews: Option<&Vec<Review>>) -> f64 {
    match reviews {
        Some(list) if !list.is_empty() => {
            list.iter().map(|r| r.rating as f64).sum::<f64>() / list.len() as f64
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store() -> RatingsStore {
        let pool = db::connect_in_memory().await.unwrap();
        RatingsStore::load(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_likes_accumulate() {
        let store = store().await;
        assert_eq!(store.likes_for("a").await, 0);
        assert_eq!(store.like("a").await.unwrap(), 1);
        assert_eq!(store.like("a").await.unwrap(), 2);
        assert_eq!(store.likes_for("a").await, 2);
        assert_eq!(store.liked_track_count().await, 1);
    }

    #[tokio::test]
    async fn test_review_validation() {
        let store = store().await;
        assert!(store.add_review("a", 0, "").await.is_err());
        assert!(store.add_review("a", 6, "").await.is_err());
        assert!(store.add_review("a", 5, "great").await.is_ok());
    }

    #[tokio::test]
    async fn test_average_rating() {
        let store = store().await;
        store.add_review("a", 5, "").await.unwrap();
        store.add_review("a", 3, "").await.unwrap();
        assert_eq!(store.average_rating("a").await, 4.0);
        assert_eq!(store.average_rating("unrated").await, 0.0);
    }

    #[tokio::test]
    async fn test_top_rated_order() {
        let store = store().await;
        store.add_review("a", 3, "").await.unwrap();
        store.add_review("b", 5, "").await.unwrap();
        let top = store.top_rated(5).await;
        assert_eq!(top[0].track_id, "b");
        assert_eq!(top[1].track_id, "a");
    }

    #[tokio::test]
    async fn test_reload_from_db() {
        let pool = db::connect_in_memory().await.unwrap();
        {
            let store = RatingsStore::load(pool.clone()).await.unwrap();
            store.like("a").await.unwrap();
            store.add_review("a", 4, "nice").await.unwrap();
        }
        let reloaded = RatingsStore::load(pool).await.unwrap();
        assert_eq!(reloaded.likes_for("a").await, 1);
        assert_eq!(reloaded.average_rating("a").await, 4.0);
    }
}
