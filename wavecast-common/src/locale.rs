//! Locale string tables
//!
//! Translations are loaded once at startup from `<locale_dir>/<lang>.json`
//! (a flat string-to-string map). A failed load falls back to the built-in
//! table; it is never a hard failure.

use std::collections::HashMap;
use std::path::Path;

/// Built-in fallback strings, used when no locale file can be loaded
fn builtin_table() -> HashMap<String, String> {
    [
        ("stationName", "Wavecast Radio"),
        ("trackTitleDefault", "Welcome to Wavecast Radio"),
        ("trackArtistDefault", "The best of technology and music"),
        ("errorPlaylistLoad", "Failed to load playlist: {{message}}"),
        ("errorTimeout", "Timed out fetching playlist"),
        ("retrying", "Retrying..."),
        ("retryFailed", "Retry failed: {{message}}"),
        ("you", "You"),
        ("aiDjName", "DJ Bot"),
        ("aiResponse1", "Thanks for your message!"),
        ("aiResponse2", "Great to have you listening!"),
        ("aiResponse3", "Excellent taste in music!"),
        ("aiResponse4", "Keep enjoying the tunes!"),
        ("messageCooldown", "Please wait 30 seconds between messages"),
        ("messageMissing", "Write a message first."),
        ("dedicationThanks", "Thank you! Your words have been saved."),
        ("dedicationCooldown", "Hold on - one memory per minute."),
        ("dedicationMissing", "Fill in both your words and a name."),
        ("dedicationTime", "Added: {{timestamp}}"),
        ("reviewMissingRating", "Select a rating first"),
        ("calendarSaved", "Entry added for {{machine}} on {{date}}"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// A resolved locale: language code plus string table
#[derive(Debug, Clone)]
pub struct Locale {
    language: String,
    table: HashMap<String, String>,
}

impl Locale {
    /// The built-in fallback locale
    pub fn fallback() -> Self {
        Self {
            language: "en".to_string(),
            table: builtin_table(),
        }
    }

    /// Load `<dir>/<lang>.json`, falling back to the built-in table.
    ///
    /// Keys present in the file shadow built-in keys; missing keys keep
    /// their built-in value so partial translations stay usable.
    pub fn load(dir: &Path, language: &str) -> Self {
        let mut table = builtin_table();
        let path = dir.join(format!("{}.json", language));

        match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<HashMap<String, String>>(&json) {
                Ok(loaded) => {
                    table.extend(loaded);
                    tracing::info!("Loaded locale '{}' from {}", language, path.display());
                }
                Err(e) => {
                    tracing::warn!(
                        "Malformed locale file {}, using built-in strings: {}",
                        path.display(),
                        e
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Could not read locale file {}, using built-in strings: {}",
                    path.display(),
                    e
                );
            }
        }

        Self {
            language: language.to_string(),
            table,
        }
    }

    /// Language code this locale was resolved for
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translate a key, substituting `{{placeholder}}` occurrences.
    ///
    /// Unknown keys render as `[key]`, matching what a UI would show for a
    /// missing translation.
    pub fn translate(&self, key: &str, replacements: &[(&str, &str)]) -> String {
        let mut text = match self.table.get(key) {
            Some(value) => value.clone(),
            None => format!("[{}]", key),
        };
        for (placeholder, value) in replacements {
            text = text.replace(&format!("{{{{{}}}}}", placeholder), value);
        }
        text
    }

    /// Canned DJ-bot replies, in table order
    pub fn dj_responses(&self) -> Vec<String> {
        (1..)
            .map(|i| format!("aiResponse{}", i))
            .map_while(|key| self.table.get(&key).cloned())
            .collect()
    }
}
