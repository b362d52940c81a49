// CSV export endpoint

use super::{snapshot, ApiError};
use crate::export;
use crate::server::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

const EXPORT_FILENAME: &str = "profitpulse_sessions.csv";

/// GET /api/export/csv - All sessions as a CSV attachment
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let sessions = snapshot(&state)?;
    let body = export::to_csv_string(&sessions)
        .map_err(|e| ApiError::Internal(format!("Failed to render CSV: {:#}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
