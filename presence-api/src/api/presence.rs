//! Presence report endpoints
//!
//! Each endpoint returns a JSON array. Unknown users get `[]`.

use axum::{
    extract::{Path, State},
    Json,
};
use presence_common::analyzer::UserSummary;
use presence_common::records::UserId;
use presence_common::weekday::{StartEndMean, PRESENCE_HEADER};
use presence_common::{Mean, PresenceAnalyzer};
use serde_json::{json, Value};

use super::ApiError;
use crate::AppState;

/// Run a report on the blocking pool; parsing reads files synchronously
async fn run_report<T, F>(state: &AppState, report: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&PresenceAnalyzer) -> presence_common::Result<T> + Send + 'static,
{
    let analyzer = state.analyzer.clone();
    tokio::task::spawn_blocking(move || report(analyzer.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("report task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// GET /api/v1/users
///
/// Users listing for the selection dropdown.
pub async fn users_view(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = run_report(&state, |analyzer| analyzer.list_users()).await?;
    Ok(Json(users))
}

/// GET /api/v1/mean_time_weekday/:user_id
///
/// Mean presence time of the user grouped by weekday.
pub async fn mean_time_weekday_view(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<(&'static str, Mean)>>, ApiError> {
    let result = run_report(&state, move |analyzer| analyzer.mean_time_weekday(user_id)).await?;
    Ok(Json(result))
}

/// GET /api/v1/presence_weekday/:user_id
///
/// Total presence time of the user grouped by weekday, preceded by a
/// header row for the chart.
pub async fn presence_weekday_view(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let totals = run_report(&state, move |analyzer| analyzer.presence_weekday(user_id)).await?;

    if totals.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let header = json!([PRESENCE_HEADER.0, PRESENCE_HEADER.1]);
    let rows = totals
        .into_iter()
        .map(|(weekday, total)| json!([weekday, total]));

    Ok(Json(std::iter::once(header).chain(rows).collect()))
}

/// GET /api/v1/presence_start_end/:user_id
///
/// Mean start and end of presence per weekday, in milliseconds.
pub async fn presence_start_end_view(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<StartEndMean>>, ApiError> {
    let result = run_report(&state, move |analyzer| analyzer.presence_start_end(user_id)).await?;
    Ok(Json(result))
}
