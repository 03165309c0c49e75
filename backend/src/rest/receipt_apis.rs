use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::domain::receipt_service::ReceiptService;

use super::{error_response, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_receipt))
        .route("/:id/pdf", get(get_receipt_pdf))
}

/// GET /api/receipts/:id
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/receipts/{}", id);

    match state.receipt_service.receipt(id).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => {
            error!("Error loading receipt: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/receipts/:id/pdf
pub async fn get_receipt_pdf(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/receipts/{}/pdf", id);

    match state.receipt_service.receipt_pdf(id).await {
        Ok(Some(bytes)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        ReceiptService::pdf_filename(id)
                    ),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            "PDF receipts are disabled on this server",
        )
            .into_response(),
        Err(e) => {
            error!("Error rendering receipt PDF: {:?}", e);
            error_response(e)
        }
    }
}
