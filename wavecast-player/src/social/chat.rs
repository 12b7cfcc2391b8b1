//! Listener chat
//!
//! Messages are rate-limited, sanitized and stored locally; keyword matches
//! grant the mapped track a temporary selection boost, and the resident DJ
//! bot answers after a short delay.

use crate::db::social::{self, ChatMessage};
use crate::error::{Error, Result};
use crate::net::SocialApiClient;
use crate::playback::boosts::{KEYWORD_BOOST_AMOUNT, KEYWORD_BOOST_TTL};
use crate::social::sanitize;
use crate::state::SharedState;
use rand::Rng;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use wavecast_common::events::RadioEvent;
use wavecast_common::locale::Locale;

/// Minimum spacing between listener messages
pub const MESSAGE_COOLDOWN: Duration = Duration::from_secs(30);

/// How many messages the feed returns
pub const MESSAGE_FEED_LIMIT: usize = 10;

/// Delay before the DJ bot answers
const DJ_REPLY_DELAY: Duration = Duration::from_millis(1500);

pub struct ChatService {
    db: SqlitePool,
    state: Arc<SharedState>,
    locale: Arc<Locale>,
    remote: Option<SocialApiClient>,
    last_post: Mutex<Option<Instant>>,
}

impl ChatService {
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

    /// Accept a listener message.
    ///
    /// Rejected locally on cooldown or empty text; those rejections never
    /// reach the persistence endpoint.
    pub async fn post(&self, author: &str, text: &str) -> Result<ChatMessage> {
        {
            let mut last_post = self.last_post.lock().await;
            if let Some(at) = *last_post {
                if at.elapsed() < MESSAGE_COOLDOWN {
                    return Err(Error::Cooldown(
                        self.locale.translate("messageCooldown", &[]),
                    ));
                }
            }
            let text = text.trim();
            if text.is_empty() {
                return Err(Error::Validation(
                    self.locale.translate("messageMissing", &[]),
                ));
            }
            *last_post = Some(Instant::now());
        }

        let author = if author.trim().is_empty() {
            self.locale.translate("you", &[])
        } else {
            sanitize(author)
        };
        let text = sanitize(text);

        self.apply_keyword_boosts(&text).await;

        let message = social::insert_message(&self.db, &author, &text, false).await?;
        self.state.broadcast_event(RadioEvent::MessagePosted {
            author: message.author.clone(),
            timestamp: message.timestamp,
        });

        if let Some(remote) = self.remote.clone() {
            let mirrored = message.clone();
            tokio::spawn(async move {
                if let Err(e) = remote.post_message(&mirrored).await {
                    warn!("Persistence endpoint rejected message, keeping local copy: {}", e);
                }
            });
        }

        self.schedule_dj_reply();
        Ok(message)
    }

    /// Latest messages, newest-last, plus a fallback flag set whenever the
    /// feed was served from local state
    pub async fn feed(&self) -> (Vec<ChatMessage>, bool) {
        if let Some(remote) = &self.remote {
            match remote.get_messages().await {
                Ok(messages) => return (messages, false),
                Err(e) => warn!("Persistence endpoint unavailable, serving local feed: {}", e),
            }
        }
        let local = social::recent_messages(&self.db, MESSAGE_FEED_LIMIT)
            .await
            .unwrap_or_default();
        (local, true)
    }

    /// Grant temp boosts for configured chat keywords found in the text
    async fn apply_keyword_boosts(&self, text: &str) {
        let Some(playlist) = self.state.playlist().await else {
            return;
        };
        let lowered = text.to_lowercase();
        let mut boosts = self.state.temp_boosts.write().await;
        for (keyword, track_id) in &playlist.config.keyword_boosts {
            if lowered.contains(&keyword.to_lowercase()) {
                boosts.add(track_id, KEYWORD_BOOST_AMOUNT, KEYWORD_BOOST_TTL);
                debug!("Keyword '{}' boosted track '{}'", keyword, track_id);
            }
        }
    }

    fn schedule_dj_reply(&self) {
        let db = self.db.clone();
        let state = Arc::clone(&self.state);
        let locale = Arc::clone(&self.locale);
        let remote = self.remote.clone();

        tokio::spawn(async move {
            tokio::time::sleep(DJ_REPLY_DELAY).await;

            let responses = locale.dj_responses();
            if responses.is_empty() {
                return;
            }
            let reply = {
                let mut rng = rand::thread_rng();
                responses[rng.gen_range(0..responses.len())].clone()
            };
            let dj_name = locale.translate("aiDjName", &[]);

            match social::insert_message(&db, &dj_name, &reply, true).await {
                Ok(message) => {
                    state.broadcast_event(RadioEvent::MessagePosted {
                        author: message.author.clone(),
                        timestamp: message.timestamp,
                    });
                    if let Some(remote) = remote {
                        if let Err(e) = remote.post_message(&message).await {
                            warn!("Could not mirror DJ reply: {}", e);
                        }
                    }
                }
                Err(e) => warn!("Could not store DJ reply: {}", e),
            }
        });
    }
}
