//! Wavecast Player - Main entry point
//!
//! Headless internet-radio daemon: fetches the playlist, restores durable
//! state, starts the dual-slot playback engine and serves the HTTP/SSE
//! control interface.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavecast_common::events::RadioEvent;
use wavecast_common::locale::Locale;
use wavecast_player::api::{self, AppContext};
use wavecast_player::audio::SimulatedOutput;
use wavecast_player::db;
use wavecast_player::db::ratings::RatingsStore;
use wavecast_player::net::{self, SocialApiClient};
use wavecast_player::social::{ChatService, DedicationService};
use wavecast_player::{PlaybackEngine, SharedState};

/// Command-line arguments for wavecast-player
#[derive(Parser, Debug)]
#[command(name = "wavecast-player")]
#[command(about = "Headless internet-radio daemon")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "WAVECAST_PORT")]
    port: u16,

    /// Data folder for the SQLite database
    #[arg(short, long, env = "WAVECAST_DATA_DIR")]
    data_dir: Option<String>,

    /// Playlist source: HTTP URL or local JSON file
    #[arg(long, default_value = "playlist.json", env = "WAVECAST_PLAYLIST")]
    playlist: String,

    /// Folder holding locale JSON files
    #[arg(long, default_value = "locales", env = "WAVECAST_LOCALE_DIR")]
    locale_dir: PathBuf,

    /// Language code for the locale table
    #[arg(long, default_value = "en", env = "WAVECAST_LANGUAGE")]
    language: String,

    /// Base URL of the chat/dedication persistence endpoint (optional)
    #[arg(long, env = "WAVECAST_SOCIAL_API")]
    social_api: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavecast_player=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Starting Wavecast Player on port {}", args.port);

    // Durable state
    let data_dir = wavecast_common::config::resolve_data_dir(
        args.data_dir.as_deref(),
        "WAVECAST_DATA_DIR",
    )
    .context("Failed to resolve data folder")?;
    let pool = db::connect(&data_dir)
        .await
        .context("Failed to open database")?;

    // Locale strings: file if available, built-in table otherwise
    let locale = Arc::new(Locale::load(&args.locale_dir, &args.language));

    let state = Arc::new(SharedState::new());
    let ratings = Arc::new(
        RatingsStore::load(pool.clone())
            .await
            .context("Failed to load ratings")?,
    );

    // Playback engine over two simulated output slots
    let engine = Arc::new(
        PlaybackEngine::new(
            pool.clone(),
            Arc::clone(&state),
            Arc::clone(&ratings),
            Box::new(SimulatedOutput::new()),
            Box::new(SimulatedOutput::new()),
        )
        .await
        .context("Failed to initialize playback engine")?,
    );
    engine.start().await;

    // Playlist fetch is startup-fatal but retryable: on failure the daemon
    // keeps serving its API and POST /playlist/reload is the retry action
    match net::playlist::load_playlist(&args.playlist).await {
        Ok(playlist) => {
            let track_count = playlist.tracks.len();
            state.set_playlist(Arc::new(playlist)).await;
            state.broadcast_event(RadioEvent::PlaylistLoaded {
                track_count,
                timestamp: chrono::Utc::now(),
            });
            if let Err(e) = engine.play_next().await {
                warn!("Could not start playback: {}", e);
            }
        }
        Err(e) => {
            warn!("Playlist load failed: {} (retry via POST /playlist/reload)", e);
            state.set_startup_error(Some(e.to_string())).await;
        }
    }

    // Social services, local-first with optional remote mirroring
    let remote = match &args.social_api {
        Some(url) => Some(
            SocialApiClient::new(url.clone()).context("Invalid persistence endpoint URL")?,
        ),
        None => None,
    };
    let chat = Arc::new(ChatService::new(
        pool.clone(),
        Arc::clone(&state),
        Arc::clone(&locale),
        remote.clone(),
    ));
    let dedications = Arc::new(DedicationService::new(
        pool.clone(),
        Arc::clone(&state),
        Arc::clone(&locale),
        remote,
    ));

    let ctx = AppContext {
        state: Arc::clone(&state),
        engine: Arc::clone(&engine),
        db: pool,
        ratings,
        chat,
        dedications,
        playlist_source: args.playlist.clone(),
    };

    // Serve until shutdown, then tear the engine down so no audio leaks
    // past the session
    tokio::select! {
        result = api::run(ctx, args.port) => {
            result.context("Server error")?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    engine.stop().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
