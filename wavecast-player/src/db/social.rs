//! Local storage for chat messages and song dedications
//!
//! This is the fallback store: the social services keep working against
//! these tables whenever the remote persistence endpoint is unavailable.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// A chat message, in the wire shape the persistence endpoint uses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: String,
    pub text: String,
    #[serde(rename = "isAI", default)]
    pub is_ai: bool,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// A song dedication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dedication {
    pub words: String,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Store a chat message locally
pub async fn insert_message(
    pool: &SqlitePool,
    author: &str,
    text: &str,
    is_ai: bool,
) -> Result<ChatMessage> {
    let message = ChatMessage {
        author: author.to_string(),
        text: text.to_string(),
        is_ai,
        timestamp: Utc::now(),
    };
    sqlx::query("INSERT INTO messages (guid, author, text, is_ai, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(&message.author)
        .bind(&message.text)
        .bind(message.is_ai as i64)
        .bind(message.timestamp.to_rfc3339())
        .execute(pool)
        .await?;
    Ok(message)
}

/// Latest `limit` messages, newest-last
pub async fn recent_messages(pool: &SqlitePool, limit: usize) -> Result<Vec<ChatMessage>> {
    let rows: Vec<(String, String, i64, String)> = sqlx::query_as(
        "SELECT author, text, is_ai, created_at FROM messages
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    let mut messages: Vec<ChatMessage> = rows
        .into_iter()
        .map(|(author, text, is_ai, created_at)| ChatMessage {
            author,
            text,
            is_ai: is_ai != 0,
            timestamp: parse_timestamp(&created_at),
        })
        .collect();
    messages.reverse();
    Ok(messages)
}

/// Store a dedication locally
pub async fn insert_dedication(pool: &SqlitePool, words: &str, name: &str) -> Result<Dedication> {
    let dedication = Dedication {
        words: words.to_string(),
        name: name.to_string(),
        timestamp: Utc::now(),
    };
    sqlx::query("INSERT INTO dedications (guid, words, name, created_at) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(&dedication.words)
        .bind(&dedication.name)
        .bind(dedication.timestamp.to_rfc3339())
        .execute(pool)
        .await?;
    Ok(dedication)
}

/// Latest `limit` dedications, newest-last
pub async fn recent_dedications(pool: &SqlitePool, limit: usize) -> Result<Vec<Dedication>> {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT words, name, created_at FROM dedications
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    let mut dedications: Vec<Dedication> = rows
        .into_iter()
        .map(|(words, name, created_at)| Dedication {
            words,
            name,
            timestamp: parse_timestamp(&created_at),
        })
        .collect();
    dedications.reverse();
    Ok(dedications)
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
