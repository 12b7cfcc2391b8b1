//! Weighted track selection
//!
//! Picks the next track from the playlist using weighted random selection:
//! jingle insertion on a songs-since-jingle interval, repeat avoidance
//! through the bounded history, and per-track weights expanded by temporary
//! boosts and average listener ratings.

use crate::playback::boosts::TempBoosts;
use rand::Rng;
use std::collections::HashMap;
use std::time::Instant;
use wavecast_common::{Playlist, Track, TrackKind};

/// Select the next track to play.
///
/// `is_preload` distinguishes standby-slot refills from committed
/// advancement: preload selections never insert jingles and never touch the
/// songs-since-jingle counter.
///
/// Mutates `history` only for the repeat-avoidance reset (when every song is
/// already in history, it is cleared and reseeded with the current track)
/// and `songs_since_jingle` per the jingle insertion rules.
///
/// Returns `None` for an empty playlist or an empty weighted pool; the
/// caller treats that as fatal for playback but recoverable for the session.
pub fn select_next(
    playlist: &Playlist,
    history: &mut Vec<String>,
    current_track: Option<&Track>,
    songs_since_jingle: &mut u32,
    boosts: &mut TempBoosts,
    average_ratings: &HashMap<String, f64>,
    is_preload: bool,
    rng: &mut impl Rng,
) -> Option<Track> {
    if playlist.tracks.is_empty() {
        return None;
    }

    // Jingle insertion: only on committed advancement, only at the interval
    let jingle_cfg = &playlist.config.jingle;
    if !is_preload && jingle_cfg.enabled && *songs_since_jingle >= jingle_cfg.every_songs {
        let jingles: Vec<&Track> = playlist.by_kind(TrackKind::Jingle).collect();
        if !jingles.is_empty() {
            *songs_since_jingle = 0;
            let pick = jingles[rng.gen_range(0..jingles.len())];
            return Some(pick.clone());
        }
        // No jingles in the playlist: fall through to song selection
    }

    // Candidate pool: songs not in recent history
    let available: Vec<&Track> = playlist
        .by_kind(TrackKind::Song)
        .filter(|t| !history.iter().any(|id| id == &t.id))
        .collect();

    let pool: Vec<&Track> = if available.is_empty() {
        // Repeat-avoidance reset: history covered every song, so start over
        // seeded with just the currently playing track
        history.clear();
        if let Some(current) = current_track {
            history.push(current.id.clone());
        }
        playlist.by_kind(TrackKind::Song).collect()
    } else {
        available
    };

    let weighted = weighted_pool(&pool, boosts, average_ratings, Instant::now());
    if weighted.is_empty() {
        return None;
    }

    let pick = weighted[rng.gen_range(0..weighted.len())].clone();

    if !is_preload && pick.kind == TrackKind::Song {
        *songs_since_jingle += 1;
    }

    Some(pick)
}

/// Expand candidates by replicating each `ceil(effective weight)` times.
///
/// Effective weight = base weight + temp boost + average rating / 2, with
/// missing boosts/ratings treated as 0 and the base clamped at 0.
pub(crate) fn weighted_pool<'a>(
    candidates: &[&'a Track],
    boosts: &mut TempBoosts,
    average_ratings: &HashMap<String, f64>,
    now: Instant,
) -> Vec<&'a Track> {
    let mut pool = Vec::new();
    for track in candidates {
        let boost = boosts.bonus_at(&track.id, now);
        let rating_boost = average_ratings.get(&track.id).copied().unwrap_or(0.0) / 2.0;
        let weight = track.weight.max(0.0) + boost + rating_boost;
        let copies = weight.ceil() as usize;
        for _ in 0..copies {
            pool.push(*track);
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use wavecast_common::model::JingleConfig;

    fn track(id: &str, kind: TrackKind, weight: f64) -> Track {
        Track {
            id: id.to_string(),
            title: id.to_uppercase(),
            artist: "Test".to_string(),
            cover: String::new(),
            src: format!("{}.mp3", id),
            kind,
            weight,
            golden: false,
            duration_secs: 120.0,
        }
    }

    fn playlist(tracks: Vec<Track>) -> Playlist {
        Playlist {
            tracks,
            config: Default::default(),
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_empty_playlist_returns_none() {
        let playlist = playlist(vec![]);
        let mut history = Vec::new();
        let mut counter = 0;
        let mut boosts = TempBoosts::new();
        let picked = select_next(
            &playlist,
            &mut history,
            None,
            &mut counter,
            &mut boosts,
            &HashMap::new(),
            false,
            &mut rng(),
        );
        assert!(picked.is_none());
    }

    #[test]
    fn test_selection_stays_within_playlist() {
        let playlist = playlist(vec![
            track("a", TrackKind::Song, 1.0),
            track("b", TrackKind::Song, 2.0),
            track("c", TrackKind::Song, 1.0),
        ]);
        let mut history = Vec::new();
        let mut counter = 0;
        let mut boosts = TempBoosts::new();
        let mut rng = rng();
        for _ in 0..50 {
            let picked = select_next(
                &playlist,
                &mut history,
                None,
                &mut counter,
                &mut boosts,
                &HashMap::new(),
                true,
                &mut rng,
            )
            .unwrap();
            assert!(playlist.track(&picked.id).is_some());
        }
    }

    #[test]
    fn test_history_exclusion_and_reset() {
        let playlist = playlist(vec![
            track("a", TrackKind::Song, 1.0),
            track("b", TrackKind::Song, 1.0),
        ]);
        let current = track("b", TrackKind::Song, 1.0);
        let mut history = vec!["a".to_string(), "b".to_string()];
        let mut counter = 0;
        let mut boosts = TempBoosts::new();

        // Every song is in history: pool falls back to the full song set and
        // history resets to just the current track
        let picked = select_next(
            &playlist,
            &mut history,
            Some(&current),
            &mut counter,
            &mut boosts,
            &HashMap::new(),
            true,
            &mut rng(),
        );
        assert!(picked.is_some());
        assert_eq!(history, vec!["b".to_string()]);
    }

    #[test]
    fn test_history_excludes_recent_tracks() {
        let playlist = playlist(vec![
            track("a", TrackKind::Song, 1.0),
            track("b", TrackKind::Song, 1.0),
        ]);
        let mut history = vec!["a".to_string()];
        let mut counter = 0;
        let mut boosts = TempBoosts::new();
        let mut rng = rng();
        for _ in 0..20 {
            let picked = select_next(
                &playlist,
                &mut history,
                None,
                &mut counter,
                &mut boosts,
                &HashMap::new(),
                true,
                &mut rng,
            )
            .unwrap();
            assert_eq!(picked.id, "b");
        }
    }

    #[test]
    fn test_weighted_pool_replication() {
        let a = track("a", TrackKind::Song, 2.0);
        let b = track("b", TrackKind::Song, 0.5);
        let c = track("c", TrackKind::Song, 0.0);
        let candidates = vec![&a, &b, &c];
        let mut boosts = TempBoosts::new();
        let now = Instant::now();

        let pool = weighted_pool(&candidates, &mut boosts, &HashMap::new(), now);
        let count = |id: &str| pool.iter().filter(|t| t.id == id).count();
        assert_eq!(count("a"), 2); // ceil(2.0)
        assert_eq!(count("b"), 1); // ceil(0.5)
        assert_eq!(count("c"), 0); // ceil(0.0)
    }

    #[test]
    fn test_weighted_pool_includes_boosts_and_ratings() {
        let a = track("a", TrackKind::Song, 1.0);
        let candidates = vec![&a];
        let mut boosts = TempBoosts::new();
        let now = Instant::now();
        boosts.add_at("a", 5.0, now + Duration::from_secs(60));
        let ratings = HashMap::from([("a".to_string(), 4.0)]);

        // 1.0 base + 5.0 boost + 4.0/2 rating = 8.0 -> 8 copies
        let pool = weighted_pool(&candidates, &mut boosts, &ratings, now);
        assert_eq!(pool.len(), 8);
    }

    #[test]
    fn test_jingle_interval() {
        let mut playlist = playlist(vec![
            track("a", TrackKind::Song, 1.0),
            track("b", TrackKind::Song, 1.0),
            track("c", TrackKind::Song, 1.0),
            track("j", TrackKind::Jingle, 1.0),
        ]);
        playlist.config.jingle = JingleConfig {
            enabled: true,
            every_songs: 4,
        };

        let mut history = Vec::new();
        let mut counter = 0;
        let mut boosts = TempBoosts::new();
        let mut rng = rng();

        // Four committed song selections
        for _ in 0..4 {
            let picked = select_next(
                &playlist,
                &mut history,
                None,
                &mut counter,
                &mut boosts,
                &HashMap::new(),
                false,
                &mut rng,
            )
            .unwrap();
            assert_eq!(picked.kind, TrackKind::Song);
        }
        assert_eq!(counter, 4);

        // The fifth committed selection is a jingle and resets the counter
        let picked = select_next(
            &playlist,
            &mut history,
            None,
            &mut counter,
            &mut boosts,
            &HashMap::new(),
            false,
            &mut rng,
        )
        .unwrap();
        assert_eq!(picked.kind, TrackKind::Jingle);
        assert_eq!(counter, 0);
    }

    #[test]
    fn test_preload_never_inserts_jingle() {
        let mut playlist = playlist(vec![
            track("a", TrackKind::Song, 1.0),
            track("j", TrackKind::Jingle, 1.0),
        ]);
        playlist.config.jingle = JingleConfig {
            enabled: true,
            every_songs: 1,
        };

        let mut history = Vec::new();
        let mut counter = 10; // far past the interval
        let mut boosts = TempBoosts::new();
        let mut rng = rng();
        for _ in 0..20 {
            let picked = select_next(
                &playlist,
                &mut history,
                None,
                &mut counter,
                &mut boosts,
                &HashMap::new(),
                true,
                &mut rng,
            )
            .unwrap();
            assert_eq!(picked.kind, TrackKind::Song);
        }
        assert_eq!(counter, 10);
    }

    #[test]
    fn test_all_zero_weights_returns_none() {
        let playlist = playlist(vec![track("a", TrackKind::Song, 0.0)]);
        let mut history = Vec::new();
        let mut counter = 0;
        let mut boosts = TempBoosts::new();
        let picked = select_next(
            &playlist,
            &mut history,
            None,
            &mut counter,
            &mut boosts,
            &HashMap::new(),
            true,
            &mut rng(),
        );
        assert!(picked.is_none());
    }
}
