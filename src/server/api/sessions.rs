// Session endpoints - list, create, update, delete
//
// Sessions are addressed by their index in repository order, which is also
// the order GET /api/sessions returns them in.

use super::{snapshot, ApiError};
use crate::analytics::DerivedSession;
use crate::server::AppState;
use crate::session::{Session, SessionDraft, SessionPatch};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

/// A stored session with its index and derived fields
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub index: usize,
    #[serde(flatten)]
    pub session: Session,
    pub profit: f64,
    pub hourly_rate: Option<f64>,
}

impl SessionView {
    fn new(index: usize, session: Session) -> Self {
        let derived = DerivedSession::new(&session);
        let (profit, hourly_rate) = (derived.profit, derived.hourly_rate);
        Self {
            index,
            session,
            profit,
            hourly_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionView>,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub ok: bool,
    pub session: SessionView,
}

/// GET /api/sessions - All sessions in repository order
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = snapshot(&state)?
        .into_iter()
        .enumerate()
        .map(|(index, session)| SessionView::new(index, session))
        .collect();
    Ok(Json(SessionsResponse { sessions }))
}

/// POST /api/sessions - Create a session
pub async fn create_session(
    State(state): State<AppState>,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let mut store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to lock session store: {}", e)))?;

    let index = store.create(draft)?;
    let session = store.sessions()[index].clone();
    tracing::info!(index, game = %session.game, "Session logged");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            ok: true,
            session: SessionView::new(index, session),
        }),
    ))
}

/// PUT /api/sessions/:index - Partial update
pub async fn update_session(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(patch): Json<SessionPatch>,
) -> Result<Json<MutationResponse>, ApiError> {
    let mut store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to lock session store: {}", e)))?;

    let session = store.update(index, patch)?.clone();
    tracing::info!(index, "Session updated");

    Ok(Json(MutationResponse {
        ok: true,
        session: SessionView::new(index, session),
    }))
}

/// DELETE /api/sessions/:index - Remove a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<MutationResponse>, ApiError> {
    let mut store = state
        .store
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to lock session store: {}", e)))?;

    let removed = store.delete(index)?;
    tracing::info!(index, "Session deleted");

    Ok(Json(MutationResponse {
        ok: true,
        session: SessionView::new(index, removed),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::api::testing;
    use axum::response::IntoResponse;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> SessionDraft {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (state, _dir) = testing::state(false);

        let body = draft(json!({
            "game": "0.25/0.50 NLH",
            "buy_in": 50.0,
            "cash_out": 95.0,
            "hours_played": 2.5,
            "tag": "tag"
        }));
        let (status, Json(created)) = create_session(State(state.clone()), Json(body))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.session.index, 0);
        assert_eq!(created.session.profit, 45.0);
        assert_eq!(created.session.hourly_rate, Some(18.0));
        assert_eq!(created.session.session.stake.as_deref(), Some("0.25/0.50"));

        let Json(list) = list_sessions(State(state)).await.unwrap();
        assert_eq!(list.sessions.len(), 1);

        let value = serde_json::to_value(&list.sessions[0]).unwrap();
        assert_eq!(value["tag"], "TAG");
        assert_eq!(value["index"], 0);
        assert_eq!(value["location"], "Unknown");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_session() {
        let (state, _dir) = testing::state(false);
        let body = draft(json!({ "game": "NLH", "buy_in": 20.0, "cash_out": 10.0, "bullets": 0 }));

        let err = create_session(State(state.clone()), Json(body))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(list) = list_sessions(State(state)).await.unwrap();
        assert!(list.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_unsent_fields() {
        let (state, _dir) = testing::state(true);
        let before = snapshot(&state).unwrap()[1].clone();
        assert_eq!(before.bullets, 2);

        let patch: SessionPatch = serde_json::from_value(json!({ "cash_out": 30.0 })).unwrap();
        let Json(updated) = update_session(State(state), Path(1), Json(patch))
            .await
            .unwrap();

        assert_eq!(updated.session.session.cash_out, 30.0);
        assert_eq!(updated.session.session.bullets, 2);
        assert_eq!(updated.session.profit, 10.0);
    }

    #[tokio::test]
    async fn test_missing_index_is_not_found() {
        let (state, _dir) = testing::state(false);

        let err = delete_session(State(state.clone()), Path(0))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = update_session(State(state), Path(7), Json(SessionPatch::default()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_session() {
        let (state, _dir) = testing::state(true);

        let Json(deleted) = delete_session(State(state.clone()), Path(0)).await.unwrap();
        assert_eq!(deleted.session.session.notes, "Ran hot vs calling station");

        assert_eq!(snapshot(&state).unwrap().len(), 19);
    }
}
