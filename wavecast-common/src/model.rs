//! Playlist and track models
//!
//! The playlist is fetched once at startup as JSON of the shape
//! `{ "tracks": [...], "config": {...} }` and is immutable for the session.

use crate::error::{Error, Result};
use crate::quiet_hours::QuietHours;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Track category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Song,
    Jingle,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Song => write!(f, "song"),
            TrackKind::Jingle => write!(f, "jingle"),
        }
    }
}

/// A single playlist entry. Immutable after playlist load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Display artist
    pub artist: String,

    /// Cover art reference
    #[serde(default)]
    pub cover: String,

    /// Audio source reference (URL or path, consumed by the audio slot)
    pub src: String,

    /// Track category (`song` or `jingle`)
    #[serde(rename = "type", default = "default_kind")]
    pub kind: TrackKind,

    /// Base selection weight (>= 0)
    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Curated highlight flag ("golden record")
    #[serde(default)]
    pub golden: bool,

    /// Duration metadata in seconds (0 = unknown)
    #[serde(rename = "durationSecs", default)]
    pub duration_secs: f64,
}

fn default_kind() -> TrackKind {
    TrackKind::Song
}

fn default_weight() -> f64 {
    1.0
}

/// Jingle insertion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JingleConfig {
    /// Whether jingles are inserted at all
    #[serde(default)]
    pub enabled: bool,

    /// Insert a jingle after this many songs
    #[serde(default = "default_every_songs")]
    pub every_songs: u32,
}

fn default_every_songs() -> u32 {
    4
}

impl Default for JingleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            every_songs: default_every_songs(),
        }
    }
}

/// Raw quiet-hours window as it appears in playlist JSON ("HH:MM" strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietHoursSpec {
    pub start: String,
    pub end: String,
}

/// Station configuration carried alongside the track list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistConfig {
    /// Jingle insertion settings
    #[serde(default)]
    pub jingle: JingleConfig,

    /// Crossfade duration in seconds
    #[serde(default = "default_crossfade_seconds")]
    pub crossfade_seconds: f64,

    /// Daily attenuation window, if configured
    #[serde(default)]
    pub quiet_hours: Option<QuietHoursSpec>,

    /// Volume multiplier applied during quiet hours
    #[serde(default = "default_quiet_attenuation")]
    pub quiet_attenuation: f64,

    /// Chat keyword -> track id; a match grants the track a temp boost
    #[serde(default)]
    pub keyword_boosts: HashMap<String, String>,
}

fn default_crossfade_seconds() -> f64 {
    2.0
}

fn default_quiet_attenuation() -> f64 {
    0.5
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            jingle: JingleConfig::default(),
            crossfade_seconds: default_crossfade_seconds(),
            quiet_hours: None,
            quiet_attenuation: default_quiet_attenuation(),
            keyword_boosts: HashMap::new(),
        }
    }
}

impl PlaylistConfig {
    /// Parse the quiet-hours window, if one is configured.
    ///
    /// A malformed window is reported and treated as "no quiet hours"
    /// rather than failing playlist load.
    pub fn quiet_hours(&self) -> Option<QuietHours> {
        let spec = self.quiet_hours.as_ref()?;
        match QuietHours::parse(&spec.start, &spec.end) {
            Ok(window) => Some(window),
            Err(e) => {
                tracing::warn!("Ignoring malformed quietHours config: {}", e);
                None
            }
        }
    }
}

/// The playlist: ordered tracks plus station config, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub tracks: Vec<Track>,

    #[serde(default)]
    pub config: PlaylistConfig,
}

impl Playlist {
    /// Parse and validate playlist JSON.
    ///
    /// An empty track list or a track with a negative weight is a fatal
    /// load error; the caller surfaces it with a retry action.
    pub fn parse(json: &str) -> Result<Self> {
        let playlist: Playlist = serde_json::from_str(json)
            .map_err(|e| Error::Playlist(format!("malformed playlist JSON: {}", e)))?;

        if playlist.tracks.is_empty() {
            return Err(Error::Playlist("playlist is empty".to_string()));
        }

        for track in &playlist.tracks {
            if track.weight < 0.0 {
                return Err(Error::Playlist(format!(
                    "track '{}' has negative weight {}",
                    track.id, track.weight
                )));
            }
        }

        Ok(playlist)
    }

    /// Look up a track by id
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// All tracks of the given kind
    pub fn by_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }

    /// Curated highlight tracks
    pub fn golden(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.golden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "tracks": [
                {"id": "a", "title": "Alpha", "artist": "Unit", "src": "a.mp3", "type": "song", "weight": 2},
                {"id": "j1", "title": "Station ID", "artist": "Station", "src": "j1.mp3", "type": "jingle"}
            ],
            "config": {
                "jingle": {"enabled": true, "everySongs": 3},
                "crossfadeSeconds": 1.5,
                "quietHours": {"start": "22:00", "end": "06:00"},
                "keywordBoosts": {"espresso": "a"}
            }
        }"#
    }

    #[test]
    fn test_parse_playlist() {
        let playlist = Playlist::parse(sample_json()).unwrap();
        assert_eq!(playlist.tracks.len(), 2);
        assert_eq!(playlist.tracks[0].weight, 2.0);
        assert_eq!(playlist.tracks[1].kind, TrackKind::Jingle);
        assert!(playlist.config.jingle.enabled);
        assert_eq!(playlist.config.jingle.every_songs, 3);
        assert_eq!(playlist.config.crossfade_seconds, 1.5);
        assert_eq!(playlist.config.keyword_boosts.get("espresso").unwrap(), "a");
    }

    #[test]
    fn test_defaults_applied() {
        let playlist = Playlist::parse(
            r#"{"tracks": [{"id": "a", "title": "A", "artist": "B", "src": "a.mp3"}]}"#,
        )
        .unwrap();
        let track = &playlist.tracks[0];
        assert_eq!(track.kind, TrackKind::Song);
        assert_eq!(track.weight, 1.0);
        assert!(!track.golden);
        assert_eq!(playlist.config.crossfade_seconds, 2.0);
        assert!(!playlist.config.jingle.enabled);
        assert!(playlist.config.quiet_hours.is_none());
    }

    #[test]
    fn test_empty_playlist_rejected() {
        let err = Playlist::parse(r#"{"tracks": []}"#).unwrap_err();
        assert!(matches!(err, Error::Playlist(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = Playlist::parse(
            r#"{"tracks": [{"id": "a", "title": "A", "artist": "B", "src": "a.mp3", "weight": -1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Playlist(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Playlist::parse("<html>not json</html>").is_err());
    }

    #[test]
    fn test_malformed_quiet_hours_ignored() {
        let playlist = Playlist::parse(
            r#"{
                "tracks": [{"id": "a", "title": "A", "artist": "B", "src": "a.mp3"}],
                "config": {"quietHours": {"start": "late", "end": "early"}}
            }"#,
        )
        .unwrap();
        assert!(playlist.config.quiet_hours().is_none());
    }
}
