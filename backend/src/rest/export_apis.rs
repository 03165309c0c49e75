use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use shared::CsvExport;

use super::{error_response, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(export_students))
        .route("/fees", get(export_fees))
        .route("/dues", get(export_dues))
}

fn csv_response(export: CsvExport) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response()
}

/// GET /api/export/students
pub async fn export_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/students");

    match state.export_service.export_students().await {
        Ok(export) => csv_response(export),
        Err(e) => {
            error!("Error exporting students: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/export/fees
pub async fn export_fees(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/fees");

    match state.export_service.export_fees().await {
        Ok(export) => csv_response(export),
        Err(e) => {
            error!("Error exporting fees: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/export/dues
pub async fn export_dues(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/export/dues");

    match state.export_service.export_dues().await {
        Ok(export) => csv_response(export),
        Err(e) => {
            error!("Error exporting dues: {:?}", e);
            error_response(e)
        }
    }
}
