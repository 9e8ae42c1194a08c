//! Backend for a small song community app.
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | GET | `/` | Liveness message |
//! | GET | `/api/profile/{user_id}` | 404 if the profile does not exist |
//! | GET | `/api/search?query=` | Filters the song list, empty query returns everything |
//! | GET | `/api/protected-data` | 401 without a valid bearer token when Supabase is configured |
//! | POST | `/api/spotify/search` | `{ "query": ..., "type": ... }`, 503 without Spotify credentials |
//!
//!
//!
//! # Modes
//!
//! - **Static**: no `SUPABASE_URL`. Profiles come from a fixed table and the
//!   protected route is open to everyone
//! - **Supabase**: `SUPABASE_URL` + `SUPABASE_ANON_KEY`. Profiles are read from the
//!   `profiles` table and tokens are checked against Supabase auth
//!
//!
//!
//! # Configuration
//!
//! Environment variables, `.env` is read on startup. Secrets are first looked up
//! in `/run/secrets/<NAME>`.
//!
//! - `RUST_PORT`, default `8000`
//! - `CORS_ORIGINS`, comma separated, default `http://localhost:5173,http://localhost:3000`
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY`
//! - `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`
//!
//! Log level through `RUST_LOG`.
//! ```sh
//! RUST_LOG=info,server=debug cargo run --bin song-app
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod search;
pub mod spotify;
pub mod state;
pub mod supabase;

use config::Config;
use routes::{catalogue_handler, profile_handler, protected_handler, root_handler, search_handler};
use state::State;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config);

    info!("Starting server...");
    let app = router(state.clone())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");

    Ok(())
}

pub fn router(state: Arc<State>) -> Result<Router> {
    let cors = cors_layer(&state.config.allowed_origins)?;

    Ok(Router::new()
        .route("/", get(root_handler))
        .route("/api/profile/{user_id}", get(profile_handler))
        .route("/api/search", get(search_handler))
        .route("/api/protected-data", get(protected_handler))
        .route("/api/spotify/search", post(catalogue_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Credentials rule out `*`, so methods and headers mirror the preflight.
fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60)))
}

async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
