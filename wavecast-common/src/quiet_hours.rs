//! Quiet-hours window handling
//!
//! A configured daily time window during which playback volume is
//! attenuated. Windows may wrap past midnight (e.g. 22:00-06:00).

use crate::error::{Error, Result};
use chrono::{Local, NaiveTime, Timelike};

/// A daily quiet-hours window parsed from "HH:MM" bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    start: NaiveTime,
    end: NaiveTime,
}

impl QuietHours {
    /// Parse a window from "HH:MM" start/end strings
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// Whether the given time of day falls inside the window.
    ///
    /// When end < start the window wraps past midnight: 22:00-06:00 covers
    /// late evening and early morning.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.end < self.start {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Whether quiet hours are active right now (local wall clock)
    pub fn active_now(&self) -> bool {
        let now = Local::now().time();
        // NaiveTime carries sub-second precision; truncate to the minute
        // so boundary comparisons match the configured "HH:MM" bounds.
        let now = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now);
        self.contains(now)
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| Error::InvalidTimeOfDay(s.to_string()))
}
