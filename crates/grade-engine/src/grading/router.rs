use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

use super::engine::SemesterInput;
use super::error::GradingError;
use super::repository::SemesterRepository;
use super::service::{GradingService, GradingServiceError, ProjectionQuery};

/// Router builder exposing semester computation, CGPA, projection and export.
pub fn grading_router<R>(service: Arc<GradingService<R>>) -> Router
where
    R: SemesterRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/semesters/:semester_id/compute",
            post(compute_handler::<R>),
        )
        .route("/api/v1/semesters/:semester_id", get(semester_handler::<R>))
        .route("/api/v1/semesters", delete(reset_handler::<R>))
        .route("/api/v1/cumulative", get(cumulative_handler::<R>))
        .route("/api/v1/projection", post(projection_handler::<R>))
        .route("/api/v1/export", get(export_handler::<R>))
        .with_state(service)
}

pub(crate) async fn compute_handler<R>(
    State(service): State<Arc<GradingService<R>>>,
    Path(semester_id): Path<u8>,
    axum::Json(input): axum::Json<SemesterInput>,
) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.compute(semester_id, &input) {
        Ok(record) => {
            let summary = record.result.summary(service.config().pass_average);
            (StatusCode::OK, axum::Json(summary)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn semester_handler<R>(
    State(service): State<Arc<GradingService<R>>>,
    Path(semester_id): Path<u8>,
) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.get(semester_id) {
        Ok(record) => {
            let payload = json!({
                "computed_at": record.computed_at,
                "summary": record.result.summary(service.config().pass_average),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reset_handler<R>(State(service): State<Arc<GradingService<R>>>) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.reset() {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cumulative_handler<R>(
    State(service): State<Arc<GradingService<R>>>,
) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.cumulative() {
        Ok(result) => {
            let summary = result.summary(service.config().pass_average);
            (StatusCode::OK, axum::Json(summary)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn projection_handler<R>(
    State(service): State<Arc<GradingService<R>>>,
    axum::Json(query): axum::Json<ProjectionQuery>,
) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.project(&query) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R>(State(service): State<Arc<GradingService<R>>>) -> Response
where
    R: SemesterRepository + 'static,
{
    match service.export_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"grade_results.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: GradingServiceError) -> Response {
    let status = match &error {
        GradingServiceError::Grading(GradingError::InvalidSemester { .. }) => {
            StatusCode::BAD_REQUEST
        }
        GradingServiceError::Grading(GradingError::CumulativeUnavailable { .. }) => {
            StatusCode::CONFLICT
        }
        GradingServiceError::Grading(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GradingServiceError::SemesterNotFound(_) | GradingServiceError::CourseNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        GradingServiceError::Repository(_) | GradingServiceError::Export(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        GradingServiceError::Grading(GradingError::InvalidConfiguration { course, .. }) => json!({
            "error": error.to_string(),
            "course": course,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, axum::Json(payload)).into_response()
}
