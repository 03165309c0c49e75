//! REST boundary. Handlers translate between HTTP and the domain services
//! and own the status-code mapping; no business rules live here.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::domain::export_service::ExportService;
use crate::domain::payment_service::PaymentService;
use crate::domain::receipt_service::ReceiptService;
use crate::domain::report_service::ReportService;
use crate::domain::student_service::StudentService;
use crate::error::LedgerError;

pub mod export_apis;
pub mod fee_apis;
pub mod receipt_apis;
pub mod report_apis;
pub mod student_apis;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub payment_service: PaymentService,
    pub report_service: ReportService,
    pub export_service: ExportService,
    pub receipt_service: ReceiptService,
}

/// Translate a domain error into an HTTP response. Storage internals are
/// logged server-side and never echoed to the client.
pub(crate) fn error_response(err: LedgerError) -> Response {
    match err {
        LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
        LedgerError::DuplicateKey(_) => (StatusCode::CONFLICT, err.to_string()).into_response(),
        LedgerError::Storage(e) => {
            error!("storage failure: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "storage failure").into_response()
        }
        LedgerError::Document(msg) => {
            error!("document generation failed: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to generate document").into_response()
        }
    }
}

/// Build the full application router. When `api_token` is set every request
/// must carry a matching `Authorization: Bearer` header.
pub fn router(state: AppState, api_token: Option<String>) -> Router {
    let api = Router::new()
        .nest("/students", student_apis::router())
        .merge(fee_apis::router())
        .nest("/receipts", receipt_apis::router())
        .nest("/reports", report_apis::router())
        .nest("/export", export_apis::router());

    let mut app = Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive());

    if let Some(token) = api_token {
        let expected = format!("Bearer {}", token);
        app = app.layer(middleware::from_fn(move |req: Request, next: Next| {
            let expected = expected.clone();
            async move {
                let presented = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok());
                if presented == Some(expected.as_str()) {
                    next.run(req).await
                } else {
                    (StatusCode::UNAUTHORIZED, "invalid or missing API token").into_response()
                }
            }
        }));
    }

    app
}
