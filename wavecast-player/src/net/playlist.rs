//! Playlist loading
//!
//! The playlist is fetched once at startup from an HTTP URL or a local
//! file. Failures here are startup-fatal but retryable: the daemon keeps
//! serving its API and exposes a reload action.

use crate::error::{Error, Result};
use std::time::Duration;
use tracing::info;
use wavecast_common::Playlist;

/// Wall-clock budget for the startup fetch
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Load and validate the playlist from a URL or file path
pub async fn load_playlist(source: &str) -> Result<Playlist> {
    let json = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source).await?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| Error::PlaylistLoad(format!("cannot read {}: {}", source, e)))?
    };

    let playlist = Playlist::parse(&json).map_err(|e| Error::PlaylistLoad(e.to_string()))?;
    info!("Loaded {} tracks from {}", playlist.tracks.len(), source);
    Ok(playlist)
}

async fn fetch_remote(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| Error::Http(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Error::PlaylistLoad(format!("timed out fetching {}", url))
        } else {
            Error::PlaylistLoad(format!("fetch failed: {}", e))
        }
    })?;

    if !response.status().is_success() {
        return Err(Error::PlaylistLoad(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    // A misconfigured server answering HTML is a common failure shape;
    // catch it before handing garbage to the JSON parser
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.contains("json") {
        return Err(Error::PlaylistLoad(format!(
            "server returned '{}' instead of JSON - check the playlist URL",
            content_type
        )));
    }

    response
        .text()
        .await
        .map_err(|e| Error::PlaylistLoad(format!("reading body failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(
            &path,
            r#"{"tracks": [{"id": "a", "title": "A", "artist": "B", "src": "a.mp3"}]}"#,
        )
        .unwrap();

        let playlist = load_playlist(path.to_str().unwrap()).await.unwrap();
        assert_eq!(playlist.tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let err = load_playlist("/nonexistent/playlist.json").await.unwrap_err();
        assert!(matches!(err, Error::PlaylistLoad(_)));
    }

    #[tokio::test]
    async fn test_empty_playlist_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(&path, r#"{"tracks": []}"#).unwrap();
        let err = load_playlist(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, Error::PlaylistLoad(_)));
    }
}
