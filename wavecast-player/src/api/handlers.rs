//! HTTP request handlers

use crate::api::server::AppContext;
use crate::db::calendar::{self, CalendarEntry};
use crate::db::ratings::{RatedTrack, Review};
use crate::db::social::{ChatMessage, Dedication};
use crate::error::Error;
use crate::state::PlaybackSnapshot;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use wavecast_common::events::RadioEvent;
use wavecast_common::Track;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(rename = "trackId")]
    track_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    #[serde(rename = "positionSecs")]
    position_secs: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VolumeBody {
    volume: f32,
}

#[derive(Debug, Serialize)]
pub struct TracksResponse {
    tracks: Vec<Track>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    history: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    #[serde(rename = "trackId")]
    track_id: String,
    count: i64,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    rating: u8,
    #[serde(default)]
    comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    reviews: Vec<Review>,
    #[serde(rename = "averageRating")]
    average_rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    author: String,
    text: String,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    success: bool,
    messages: Vec<ChatMessage>,
    fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct DedicationRequest {
    words: String,
    name: String,
}

#[derive(Debug, Serialize)]
pub struct DedicationsResponse {
    success: bool,
    dedications: Vec<Dedication>,
    fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ListenersResponse {
    listeners: i64,
}

#[derive(Debug, Serialize)]
pub struct MachinesResponse {
    machines: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarRequest {
    date: String,
    machine: String,
    #[serde(rename = "entryType")]
    entry_type: String,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    entries: Vec<CalendarEntry>,
}

type HandlerError = (StatusCode, Json<StatusResponse>);

/// Map a player error onto an HTTP status
fn error_response(err: &Error) -> HandlerError {
    let status = match err {
        Error::TrackNotFound(_) => StatusCode::NOT_FOUND,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Cooldown(_) => StatusCode::TOO_MANY_REQUESTS,
        Error::PlaylistLoad(_) => StatusCode::BAD_GATEWAY,
        Error::InvalidState(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(StatusResponse { status: err.to_string() }))
}

fn ok() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

// ============================================================================
// Health
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "wavecast_player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Playback control
// ============================================================================

/// GET /playback/state - Read-only playback snapshot
pub async fn get_state(State(ctx): State<AppContext>) -> Json<PlaybackSnapshot> {
    Json(ctx.engine.status().await)
}

/// POST /playback/play
pub async fn play(State(ctx): State<AppContext>) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.engine.play().await.map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// POST /playback/pause
pub async fn pause(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    ctx.engine.pause().await;
    ok()
}

/// POST /playback/toggle
pub async fn toggle(State(ctx): State<AppContext>) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.engine.toggle().await.map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// POST /playback/next - Skip to a fresh selector pick
pub async fn skip_next(State(ctx): State<AppContext>) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.engine.play_next().await.map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// POST /playback/select - Manual track selection; always wins over
/// in-flight automatic transitions
pub async fn select_track(
    State(ctx): State<AppContext>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    info!("Manual selection request: {}", req.track_id);
    ctx.engine
        .select_track(&req.track_id)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// POST /playback/preload - Refill the standby slot
pub async fn preload_next(
    State(ctx): State<AppContext>,
) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.engine
        .preload_next()
        .await
        .map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// POST /playback/seek
pub async fn seek(
    State(ctx): State<AppContext>,
    Json(req): Json<SeekRequest>,
) -> Json<StatusResponse> {
    ctx.engine.seek(req.position_secs).await;
    ok()
}

/// GET /playback/volume
pub async fn get_volume(State(ctx): State<AppContext>) -> Json<VolumeBody> {
    Json(VolumeBody {
        volume: ctx.state.volume().await,
    })
}

/// POST /playback/volume
pub async fn set_volume(
    State(ctx): State<AppContext>,
    Json(req): Json<VolumeBody>,
) -> Result<Json<VolumeBody>, HandlerError> {
    ctx.engine
        .set_volume(req.volume)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(VolumeBody {
        volume: ctx.state.volume().await,
    }))
}

// ============================================================================
// Playlist
// ============================================================================

/// POST /playlist/reload - Manual retry action for the startup-fatal
/// playlist error
pub async fn reload_playlist(
    State(ctx): State<AppContext>,
) -> Result<Json<StatusResponse>, HandlerError> {
    match crate::net::playlist::load_playlist(&ctx.playlist_source).await {
        Ok(playlist) => {
            let track_count = playlist.tracks.len();
            ctx.state.set_playlist(Arc::new(playlist)).await;
            ctx.state.broadcast_event(RadioEvent::PlaylistLoaded {
                track_count,
                timestamp: chrono::Utc::now(),
            });
            // If the radio never started, start it now
            if ctx.state.current_track().await.is_none() {
                if let Err(e) = ctx.engine.play_next().await {
                    error!("Could not start playback after reload: {}", e);
                }
            }
            Ok(Json(StatusResponse {
                status: format!("loaded {} tracks", track_count),
            }))
        }
        Err(e) => {
            ctx.state.set_startup_error(Some(e.to_string())).await;
            Err(error_response(&e))
        }
    }
}

/// GET /tracks
pub async fn list_tracks(State(ctx): State<AppContext>) -> Json<TracksResponse> {
    let tracks = match ctx.state.playlist().await {
        Some(playlist) => playlist.tracks.clone(),
        None => Vec::new(),
    };
    Json(TracksResponse { tracks })
}

/// GET /tracks/golden - Curated highlights
pub async fn golden_tracks(State(ctx): State<AppContext>) -> Json<TracksResponse> {
    let tracks = match ctx.state.playlist().await {
        Some(playlist) => playlist.golden().cloned().collect(),
        None => Vec::new(),
    };
    Json(TracksResponse { tracks })
}

/// GET /tracks/top-rated
pub async fn top_rated(State(ctx): State<AppContext>) -> Json<Vec<RatedTrack>> {
    Json(ctx.ratings.top_rated(5).await)
}

/// GET /history
pub async fn get_history(State(ctx): State<AppContext>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: ctx.state.history().await,
    })
}

/// POST /tracks/:track_id/like
pub async fn like_track(
    State(ctx): State<AppContext>,
    Path(track_id): Path<String>,
) -> Result<Json<LikeResponse>, HandlerError> {
    let count = ctx
        .ratings
        .like(&track_id)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(LikeResponse { track_id, count }))
}

/// GET /tracks/:track_id/reviews
pub async fn get_reviews(
    State(ctx): State<AppContext>,
    Path(track_id): Path<String>,
) -> Json<ReviewsResponse> {
    Json(ReviewsResponse {
        reviews: ctx.ratings.reviews_for(&track_id).await,
        average_rating: ctx.ratings.average_rating(&track_id).await,
    })
}

/// POST /tracks/:track_id/reviews
pub async fn add_review(
    State(ctx): State<AppContext>,
    Path(track_id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewsResponse>, HandlerError> {
    ctx.ratings
        .add_review(&track_id, req.rating, &req.comment)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(ReviewsResponse {
        reviews: ctx.ratings.reviews_for(&track_id).await,
        average_rating: ctx.ratings.average_rating(&track_id).await,
    }))
}

// ============================================================================
// Social
// ============================================================================

/// GET /chat/messages
pub async fn chat_feed(State(ctx): State<AppContext>) -> Json<MessagesResponse> {
    let (messages, fallback) = ctx.chat.feed().await;
    Json(MessagesResponse {
        success: true,
        messages,
        fallback,
    })
}

/// POST /chat/messages
pub async fn post_message(
    State(ctx): State<AppContext>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.chat
        .post(&req.author, &req.text)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// GET /dedications
pub async fn dedication_feed(State(ctx): State<AppContext>) -> Json<DedicationsResponse> {
    let (dedications, fallback) = ctx.dedications.feed().await;
    Json(DedicationsResponse {
        success: true,
        dedications,
        fallback,
    })
}

/// POST /dedications
pub async fn post_dedication(
    State(ctx): State<AppContext>,
    Json(req): Json<DedicationRequest>,
) -> Result<Json<StatusResponse>, HandlerError> {
    ctx.dedications
        .post(&req.words, &req.name)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(ok())
}

/// GET /listeners - Simulated listener count, seeded from likes and the
/// current track's rating
pub async fn listener_count(State(ctx): State<AppContext>) -> Json<ListenersResponse> {
    let base = 5 + (ctx.ratings.liked_track_count().await % 10) as i64;
    let rating_bonus = match ctx.state.current_track_id().await {
        Some(track_id) => (ctx.ratings.average_rating(&track_id).await * 2.0).floor() as i64,
        None => 0,
    };
    let variance = rand::thread_rng().gen_range(-3..=3);
    Json(ListenersResponse {
        listeners: (base + rating_bonus + variance).max(0),
    })
}

// ============================================================================
// Maintenance calendar
// ============================================================================

/// GET /calendar/machines
pub async fn calendar_machines() -> Json<MachinesResponse> {
    Json(MachinesResponse {
        machines: calendar::MACHINES.iter().map(|m| m.to_string()).collect(),
    })
}

/// GET /calendar/:year/:month
pub async fn calendar_month(
    State(ctx): State<AppContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<CalendarResponse>, HandlerError> {
    let entries = calendar::entries_for_month(&ctx.db, year, month)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(CalendarResponse { entries }))
}

/// POST /calendar
pub async fn calendar_add(
    State(ctx): State<AppContext>,
    Json(req): Json<CalendarRequest>,
) -> Result<Json<CalendarResponse>, HandlerError> {
    calendar::add_entry(&ctx.db, &req.date, &req.machine, &req.entry_type)
        .await
        .map_err(|e| error_response(&e))?;
    let entries = calendar::entries_for_date(&ctx.db, &req.date)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(CalendarResponse { entries }))
}
