// HTTP API module - exposes the analytics engine and session CRUD
//
// All endpoints return JSON (except the CSV export) and are designed for
// local consumption only. Binds to 127.0.0.1 by default.

mod export;
mod sessions;
mod stats;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::config::VERSION;
use crate::session::Session;
use crate::storage::StoreError;

// Re-export endpoint handlers
pub use export::export_csv;
pub use sessions::{create_session, delete_session, list_sessions, update_session};
pub use stats::{get_advanced_stats, get_advice, get_groups, get_history, get_summary};

/// API error responses
/// Converted to HTTP status codes via IntoResponse
#[derive(Debug)]
pub enum ApiError {
    Internal(String),
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        tracing::error!("API error: {} - {}", status, message);

        (status, message).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::Invalid(_) => ApiError::BadRequest(e.to_string()),
            StoreError::Io(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Copy the current sessions out of the store so the lock is not held
/// while the engine runs
pub(super) fn snapshot(state: &AppState) -> Result<Vec<Session>, ApiError> {
    let store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to lock session store: {}", e)))?;
    Ok(store.sessions().to_vec())
}

/// GET /api/health
pub async fn health(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::AppState;
    use crate::analytics::Settings;
    use crate::storage::SessionStore;
    use tempfile::TempDir;

    /// State backed by a store in a fresh temp dir. Keep the TempDir alive
    /// for as long as the state is used.
    pub fn state(seed_demo: bool) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("sessions.json"), seed_demo).unwrap();
        (AppState::new(store, Settings::default()), dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ValidationError;

    #[tokio::test]
    async fn test_health() {
        let (state, _dir) = testing::state(false);
        let Json(body) = health(State(state)).await;
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_store_errors_map_to_status() {
        let not_found = ApiError::from(StoreError::NotFound { index: 4, len: 2 });
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::from(StoreError::Invalid(ValidationError {
            field: "buy_in",
            reason: "must be a non-negative number, got -1".to_string(),
        }));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let io = ApiError::from(StoreError::Io(anyhow::anyhow!("disk full")));
        assert_eq!(
            io.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
