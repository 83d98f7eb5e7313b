//! Liveness and data source availability

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SourceStatus {
    pub data_csv: bool,
    pub users_xml: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when both data files are present, "degraded" otherwise
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub sources: SourceStatus,
}

/// GET /health
///
/// Only checks that the data files exist; nothing is parsed or cached, so a
/// malformed file still reports "ok". Always 200 while the process is up.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let paths = state.analyzer.sources();
    let sources = SourceStatus {
        data_csv: paths.data_csv.is_file(),
        users_xml: paths.users_xml.is_file(),
    };

    let status = if sources.data_csv && sources.users_xml {
        "ok"
    } else {
        warn!(
            "Data source missing: data_csv={} users_xml={}",
            paths.data_csv.display(),
            paths.users_xml.display()
        );
        "degraded"
    };

    Json(HealthResponse {
        status,
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        sources,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
