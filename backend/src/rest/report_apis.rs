use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use super::{error_response, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dues", get(dues))
}

#[derive(Deserialize, Debug)]
pub struct DuesQuery {
    pub q: Option<String>,
}

/// GET /api/reports/dashboard
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reports/dashboard");

    match state.report_service.dashboard_totals().await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(e) => {
            error!("Error computing dashboard totals: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/reports/dues
pub async fn dues(
    State(state): State<AppState>,
    Query(query): Query<DuesQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/dues - query: {:?}", query);

    match state.report_service.dues_report(query.q.as_deref()).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => {
            error!("Error building dues report: {:?}", e);
            error_response(e)
        }
    }
}
