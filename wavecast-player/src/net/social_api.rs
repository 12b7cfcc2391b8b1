//! Client for the external chat/dedication persistence endpoint
//!
//! The endpoint is a stateless request/response API: `GET ?action=messages`
//! and `GET ?action=dedications` return the latest entries newest-last;
//! `POST ?action=message` / `POST ?action=dedication` append one entry and
//! return its new row id. Every failure here is non-fatal — the services
//! fall back to local storage.

use crate::db::social::{ChatMessage, Dedication};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct DedicationsResponse {
    #[serde(default)]
    dedications: Vec<Dedication>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    id: Option<i64>,
}

#[derive(Clone)]
pub struct SocialApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl SocialApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { base_url, http })
    }

    /// Latest messages from the endpoint, newest-last
    pub async fn get_messages(&self) -> Result<Vec<ChatMessage>> {
        let response: MessagesResponse = self.get("messages").await?;
        Ok(response.messages)
    }

    /// Latest dedications from the endpoint, newest-last
    pub async fn get_dedications(&self) -> Result<Vec<Dedication>> {
        let response: DedicationsResponse = self.get("dedications").await?;
        Ok(response.dedications)
    }

    /// Append one message; returns the new row id if the endpoint sent one
    pub async fn post_message(&self, message: &ChatMessage) -> Result<Option<i64>> {
        let body = json!({
            "author": message.author,
            "text": message.text,
            "isAI": message.is_ai,
        });
        self.post("message", body).await
    }

    /// Append one dedication
    pub async fn post_dedication(&self, dedication: &Dedication) -> Result<Option<i64>> {
        let body = json!({
            "words": dedication.words,
            "name": dedication.name,
        });
        self.post("dedication", body).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, action: &str) -> Result<T> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", action)])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "persistence endpoint returned HTTP {}",
                response.status()
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| Error::Http(e.to_string()))
    }

    async fn post(&self, action: &str, body: serde_json::Value) -> Result<Option<i64>> {
        let response = self
            .http
            .post(&self.base_url)
            .query(&[("action", action)])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Http(format!(
                "persistence endpoint returned HTTP {}",
                response.status()
            )));
        }
        let parsed: PostResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(parsed.id)
    }
}
