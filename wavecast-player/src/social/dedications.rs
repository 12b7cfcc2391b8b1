//! Song dedications ("song capsule")
//!
//! Listeners leave a few words and a name to shine in their memory song.
//! One dedication per minute; both fields required.

use crate::db::social::{self, Dedication};
use crate::error::{Error, Result};
use crate::net::SocialApiClient;
use crate::social::sanitize;
use crate::state::SharedState;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;
use wavecast_common::events::RadioEvent;
use wavecast_common::locale::Locale;

/// Minimum spacing between dedications
pub const DEDICATION_COOLDOWN: Duration = Duration::from_secs(60);

/// How many dedications the feed returns
pub const DEDICATION_FEED_LIMIT: usize = 15;

pub struct DedicationService {
    db: SqlitePool,
    state: Arc<SharedState>,
    locale: Arc<Locale>,
    remote: Option<SocialApiClient>,
    last_post: Mutex<Option<Instant>>,
}

impl DedicationService {
    pub fn new(
        db: SqlitePool,
        state: Arc<SharedState>,
        locale: Arc<Locale>,
        remote: Option<SocialApiClient>,
    ) -> Self {
        Self {
            db,
            state,
            locale,
            remote,
            last_post: Mutex::new(None),
        }
    }

    /// Accept a dedication. Rejected locally on cooldown or missing fields.
    pub async fn post(&self, words: &str, name: &str) -> Result<Dedication> {
        {
            let mut last_post = self.last_post.lock().await;
            if let Some(at) = *last_post {
                if at.elapsed() < DEDICATION_COOLDOWN {
                    return Err(Error::Cooldown(
                        self.locale.translate("dedicationCooldown", &[]),
                    ));
                }
            }
            if words.trim().is_empty() || name.trim().is_empty() {
                return Err(Error::Validation(
                    self.locale.translate("dedicationMissing", &[]),
                ));
            }
            *last_post = Some(Instant::now());
        }

        let words = sanitize(words);
        let name = sanitize(name);

        let dedication = social::insert_dedication(&self.db, &words, &name).await?;
        self.state.broadcast_event(RadioEvent::DedicationPosted {
            name: dedication.name.clone(),
            timestamp: dedication.timestamp,
        });

        if let Some(remote) = self.remote.clone() {
            let mirrored = dedication.clone();
            tokio::spawn(async move {
                if let Err(e) = remote.post_dedication(&mirrored).await {
                    warn!(
                        "Persistence endpoint rejected dedication, keeping local copy: {}",
                        e
                    );
                }
            });
        }

        Ok(dedication)
    }

    /// Latest dedications, newest-last, plus the local-fallback flag
    pub async fn feed(&self) -> (Vec<Dedication>, bool) {
        if let Some(remote) = &self.remote {
            match remote.get_dedications().await {
                Ok(dedications) => return (dedications, false),
                Err(e) => warn!("Persistence endpoint unavailable, serving local feed: {}", e),
            }
        }
        let local = social::recent_dedications(&self.db, DEDICATION_FEED_LIMIT)
            .await
            .unwrap_or_default();
        (local, true)
    }
}
