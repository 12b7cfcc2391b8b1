//! HTTP server setup and routing

use crate::db::ratings::RatingsStore;
use crate::error::{Error, Result};
use crate::playback::PlaybackEngine;
use crate::social::{ChatService, DedicationService};
use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<SharedState>,
    pub engine: Arc<PlaybackEngine>,
    pub db: SqlitePool,
    pub ratings: Arc<RatingsStore>,
    pub chat: Arc<ChatService>,
    pub dedications: Arc<DedicationService>,
    /// Playlist URL or path, kept for the manual reload action
    pub playlist_source: String,
}

/// Build the application router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(super::handlers::health))

        // Playback control
        .route("/playback/state", get(super::handlers::get_state))
        .route("/playback/play", post(super::handlers::play))
        .route("/playback/pause", post(super::handlers::pause))
        .route("/playback/toggle", post(super::handlers::toggle))
        .route("/playback/next", post(super::handlers::skip_next))
        .route("/playback/select", post(super::handlers::select_track))
        .route("/playback/preload", post(super::handlers::preload_next))
        .route("/playback/seek", post(super::handlers::seek))
        .route("/playback/volume", get(super::handlers::get_volume))
        .route("/playback/volume", post(super::handlers::set_volume))

        // Playlist
        .route("/playlist/reload", post(super::handlers::reload_playlist))
        .route("/tracks", get(super::handlers::list_tracks))
        .route("/tracks/golden", get(super::handlers::golden_tracks))
        .route("/tracks/top-rated", get(super::handlers::top_rated))
        .route("/tracks/:track_id/like", post(super::handlers::like_track))
        .route("/tracks/:track_id/reviews", get(super::handlers::get_reviews))
        .route("/tracks/:track_id/reviews", post(super::handlers::add_review))
        .route("/history", get(super::handlers::get_history))

        // Social
        .route("/chat/messages", get(super::handlers::chat_feed))
        .route("/chat/messages", post(super::handlers::post_message))
        .route("/dedications", get(super::handlers::dedication_feed))
        .route("/dedications", post(super::handlers::post_dedication))
        .route("/listeners", get(super::handlers::listener_count))

        // Maintenance calendar
        .route("/calendar/machines", get(super::handlers::calendar_machines))
        .route("/calendar/:year/:month", get(super::handlers::calendar_month))
        .route("/calendar", post(super::handlers::calendar_add))

        // SSE event stream
        .route("/events", get(super::sse::event_stream))

        // Attach application context
        .with_state(ctx)

        // Enable CORS for local UI access
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server
pub async fn run(ctx: AppContext, port: u16) -> Result<()> {
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    Ok(())
}
