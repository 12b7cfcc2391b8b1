//! Transient selection-weight boosts
//!
//! Chat keyword triggers grant a track a temporary weight bonus. Each grant
//! is stored with its own expiry instant; the effective bonus is the sum of
//! unexpired entries, and expired entries are purged lazily on read.
//! Overlapping grants for the same track therefore stack and expire
//! independently.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default bonus granted per keyword trigger
pub const KEYWORD_BOOST_AMOUNT: f64 = 5.0;

/// How long a keyword boost lasts
pub const KEYWORD_BOOST_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct BoostEntry {
    amount: f64,
    expires_at: Instant,
}

/// Map from track id to its transient weight bonuses
#[derive(Debug, Default)]
pub struct TempBoosts {
    entries: HashMap<String, Vec<BoostEntry>>,
}

impl TempBoosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `amount` to `track_id` for `ttl` from now
    pub fn add(&mut self, track_id: &str, amount: f64, ttl: Duration) {
        self.add_at(track_id, amount, Instant::now() + ttl);
    }

    /// Grant `amount` to `track_id` until `expires_at`
    pub fn add_at(&mut self, track_id: &str, amount: f64, expires_at: Instant) {
        self.entries
            .entry(track_id.to_string())
            .or_default()
            .push(BoostEntry { amount, expires_at });
    }

    /// Effective bonus for a track right now
    pub fn bonus(&mut self, track_id: &str) -> f64 {
        self.bonus_at(track_id, Instant::now())
    }

    /// Effective bonus for a track at `now`, purging expired entries
    pub fn bonus_at(&mut self, track_id: &str, now: Instant) -> f64 {
        let Some(entries) = self.entries.get_mut(track_id) else {
            return 0.0;
        };
        entries.retain(|e| e.expires_at > now);
        if entries.is_empty() {
            self.entries.remove(track_id);
            return 0.0;
        }
        entries.iter().map(|e| e.amount).sum()
    }

    /// Track ids with at least one unexpired boost
    pub fn boosted_ids_at(&mut self, now: Instant) -> Vec<String> {
        self.entries
            .retain(|_, entries| {
                entries.retain(|e| e.expires_at > now);
                !entries.is_empty()
            });
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_boost_is_zero() {
        let mut boosts = TempBoosts::new();
        assert_eq!(boosts.bonus("x"), 0.0);
    }

    #[test]
    fn test_overlapping_boosts_stack() {
        let mut boosts = TempBoosts::new();
        let now = Instant::now();
        boosts.add_at("x", 5.0, now + Duration::from_secs(600));
        boosts.add_at("x", 5.0, now + Duration::from_secs(900));
        assert_eq!(boosts.bonus_at("x", now), 10.0);
    }

    #[test]
    fn test_boosts_expire_independently() {
        let mut boosts = TempBoosts::new();
        let now = Instant::now();
        boosts.add_at("x", 5.0, now + Duration::from_secs(10));
        boosts.add_at("x", 3.0, now + Duration::from_secs(100));

        assert_eq!(boosts.bonus_at("x", now + Duration::from_secs(11)), 3.0);
        assert_eq!(boosts.bonus_at("x", now + Duration::from_secs(101)), 0.0);
        // Fully expired entries are gone
        assert!(boosts.entries.is_empty());
    }

    #[test]
    fn test_boosted_ids_purges() {
        let mut boosts = TempBoosts::new();
        let now = Instant::now();
        boosts.add_at("x", 5.0, now + Duration::from_secs(10));
        boosts.add_at("y", 5.0, now + Duration::from_secs(100));

        let mut ids = boosts.boosted_ids_at(now + Duration::from_secs(50));
        ids.sort();
        assert_eq!(ids, vec!["y".to_string()]);
    }
}
