//! HTTP server setup and initialization
//!
//! A small local JSON API over the session repository and the analytics
//! engine. Every analytics endpoint takes a snapshot of the sessions under
//! the store lock, releases it, and recomputes from scratch.

pub mod api;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;

use crate::analytics::Settings;
use crate::config::Config;
use crate::storage::SessionStore;

/// Session repository shared between handlers
pub type SharedStore = Arc<Mutex<SessionStore>>;

/// Shared state for the API handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    /// Engine parameters from configuration
    pub settings: Settings,
}

impl AppState {
    pub fn new(store: SessionStore, settings: Settings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            settings,
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/summary", get(api::get_summary))
        .route("/api/history", get(api::get_history))
        .route("/api/stats/advanced", get(api::get_advanced_stats))
        .route("/api/stats/groups/:dimension", get(api::get_groups))
        .route("/api/advice", get(api::get_advice))
        .route(
            "/api/sessions",
            get(api::list_sessions).post(api::create_session),
        )
        .route(
            "/api/sessions/:index",
            put(api::update_session).delete(api::delete_session),
        )
        .route("/api/export/csv", get(api::export_csv))
        .with_state(state)
}

/// Open the store and serve the API until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let store = SessionStore::open(&config.data_file, config.analytics.seed_demo_data)?;
    tracing::info!(
        data_file = %store.path().display(),
        sessions = store.sessions().len(),
        "Session store ready"
    );
    let state = AppState::new(store, config.analytics.settings());
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    tracing::info!("API listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
