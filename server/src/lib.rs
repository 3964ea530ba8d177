//! HTTP front end for the worldfeel engine.
//!
//! Routes:
//! - `POST /api/submit`: share a word, edit it inside the edit window
//! - `GET /api/stats`: current aggregate, optionally focused on a word
//! - `GET /health`: liveness
//!
//! All core calls are blocking redb operations and run on the blocking pool.

use std::{net::SocketAddr, sync::Arc, time::Duration, time::SystemTime};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal, task::spawn_blocking, time::interval};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use worldfeel_core::types::ServerConfig;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use config::Settings;
use error::StartupError;
use routes::{health_handler, stats_handler, submit_handler};
use state::State;

pub fn router(state: Arc<State>, server: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/submit", post(submit_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TimeoutLayer::new(Duration::from_secs(u64::from(
            server.request_timeout_secs,
        ))))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), StartupError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading settings...");
    let settings = Settings::load()?;
    let server = settings.app.server.clone();

    info!("Initializing state...");
    let state = State::new(settings)?;

    tokio::spawn(purge_expired(state.clone()));

    let app = router(state, &server);

    info!("Binding to {}", server.bind);
    let listener = TcpListener::bind(&server.bind).await?;
    info!("Server running on {}", server.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

/// Background expiry: purges records whose retention has passed.
async fn purge_expired(state: Arc<State>) {
    let period = state.purge_interval;
    let mut ticker = interval(period);

    loop {
        ticker.tick().await;

        let state = state.clone();
        let pass = spawn_blocking(move || {
            let now = SystemTime::now();
            if !state.coordinator.should_run_maintenance(now, period) {
                return Ok(None);
            }
            state.coordinator.maintenance(now).map(Some)
        })
        .await;

        match pass {
            Ok(Ok(Some(outcome))) => info!(
                purged = outcome.records_purged.len(),
                swept = outcome.cache_entries_swept,
                "Maintenance pass finished"
            ),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => error!("Maintenance pass failed: {e}"),
            Err(e) => error!("Maintenance task panicked: {e}"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
