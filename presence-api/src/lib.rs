//! presence-api library - HTTP surface of the presence analyzer
//!
//! Read-only JSON endpoints over attendance and user directory data.

use std::sync::Arc;

use axum::Router;
use presence_common::PresenceAnalyzer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Report operations with their parse caches
    pub analyzer: Arc<PresenceAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: PresenceAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let reports = Router::new()
        .route("/api/v1/users", get(api::users_view))
        .route("/api/v1/mean_time_weekday/:user_id", get(api::mean_time_weekday_view))
        .route("/api/v1/presence_weekday/:user_id", get(api::presence_weekday_view))
        .route("/api/v1/presence_start_end/:user_id", get(api::presence_start_end_view));

    Router::new()
        .merge(reports)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
