use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use shared::{CreateStudentRequest, UpdateStudentRequest};

use super::{error_response, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/lookup", get(lookup_student))
        .route(
            "/:id",
            get(get_student_profile)
                .put(update_student)
                .delete(delete_student),
        )
}

#[derive(Deserialize, Debug)]
pub struct StudentListQuery {
    pub q: Option<String>,
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    info!("POST /api/students - roll: {}", request.roll_no);

    match state.payment_service.record_admission(&request).await {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(e) => {
            error!("Error admitting student: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> impl IntoResponse {
    info!("GET /api/students - query: {:?}", query);

    match state.student_service.list_students(query.q.as_deref()).await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(e) => {
            error!("Error listing students: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/students/lookup
pub async fn lookup_student(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> impl IntoResponse {
    info!("GET /api/students/lookup - query: {:?}", query);

    match state
        .student_service
        .search(query.q.as_deref().unwrap_or_default())
        .await
    {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "no matching student").into_response(),
        Err(e) => {
            error!("Error searching students: {:?}", e);
            error_response(e)
        }
    }
}

/// GET /api/students/:id
pub async fn get_student_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", id);

    match state.student_service.profile(id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Error loading student profile: {:?}", e);
            error_response(e)
        }
    }
}

/// PUT /api/students/:id
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    info!("PUT /api/students/{}", id);

    match state.student_service.update_student(id, &request).await {
        Ok(student) => (StatusCode::OK, Json(student)).into_response(),
        Err(e) => {
            error!("Error updating student: {:?}", e);
            error_response(e)
        }
    }
}

/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/students/{}", id);

    match state.student_service.delete_student(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Error deleting student: {:?}", e);
            error_response(e)
        }
    }
}
