// Analytics endpoints - summary, bankroll history, stats, grouped stats, advice

use super::{snapshot, ApiError};
use crate::analytics::{
    AdvisoryNote, Analytics, BankrollSeries, Dimension, GroupEntry, RangeMode, SeriesMode,
    StatsSnapshot,
};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: Vec<String>,
}

/// GET /api/summary - Summary lines for the dashboard header
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, ApiError> {
    let sessions = snapshot(&state)?;
    let analytics = Analytics::new(&sessions, state.settings);
    Ok(Json(SummaryResponse {
        summary: analytics.summary_lines(),
    }))
}

/// Query parameters for /api/history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// all (default), last10, last20
    pub range: Option<RangeMode>,
    /// bankroll (default) or profit
    pub mode: Option<SeriesMode>,
    /// Moving average window; configured default when absent
    pub window: Option<usize>,
}

/// GET /api/history - Bankroll chart series
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<BankrollSeries>, ApiError> {
    let sessions = snapshot(&state)?;
    let analytics = Analytics::new(&sessions, state.settings);

    let range = params.range.unwrap_or_default();
    let mode = params.mode.unwrap_or_default();
    let series = match params.window {
        Some(window) => analytics.bankroll_series_with_window(range, mode, window),
        None => analytics.bankroll_series(range, mode),
    };

    tracing::debug!(?range, ?mode, points = series.values.len(), "History requested");
    Ok(Json(series))
}

/// GET /api/stats/advanced - Full statistics snapshot
pub async fn get_advanced_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsSnapshot>, ApiError> {
    let sessions = snapshot(&state)?;
    Ok(Json(Analytics::new(&sessions, state.settings).advanced_stats()))
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub dimension: Dimension,
    pub groups: Vec<GroupEntry>,
}

/// GET /api/stats/groups/:dimension - One grouped breakdown
///
/// Dimensions: game, location, tag, length
pub async fn get_groups(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
) -> Result<Json<GroupsResponse>, ApiError> {
    let dimension = Dimension::parse(&dimension).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Unknown dimension '{}'. Expected one of: game, location, tag, length",
            dimension
        ))
    })?;

    let sessions = snapshot(&state)?;
    let groups = Analytics::new(&sessions, state.settings).grouped_stats(dimension);
    Ok(Json(GroupsResponse { dimension, groups }))
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub notes: Vec<AdvisoryNote>,
}

/// GET /api/advice - Advisory notes from the rule table
pub async fn get_advice(State(state): State<AppState>) -> Result<Json<AdviceResponse>, ApiError> {
    let sessions = snapshot(&state)?;
    Ok(Json(AdviceResponse {
        notes: Analytics::new(&sessions, state.settings).advisory_notes(),
    }))
}
