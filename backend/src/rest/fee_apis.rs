use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use shared::RecordPaymentRequest;

use super::{error_response, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments", post(record_payment))
        .route("/fees", get(list_fees))
}

/// POST /api/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Json(request): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/payments - roll: {}, amount: {}",
        request.roll_no, request.amount
    );

    match state.payment_service.record_payment(&request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Error recording payment: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/fees
pub async fn list_fees(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/fees");

    match state.payment_service.list_fees().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => {
            error!("Error listing fees: {:?}", e);
            error_response(e)
        }
    }
}
