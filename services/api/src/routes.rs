use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use grade_engine::error::AppError;
use grade_engine::grading::cohort::read_sample;
use grade_engine::grading::mapper::{Multipliers, RelativeCutoffs};
use grade_engine::grading::{
    grading_router, CohortError, CohortStats, GradePoint, GradingService, SemesterRepository,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

/// Cohort sample uploaded as CSV text, with optional letter multiplier overrides.
#[derive(Debug, Deserialize)]
pub(crate) struct CohortRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) multipliers: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CohortResponse {
    pub(crate) sample_size: usize,
    pub(crate) stats: CohortStats,
    pub(crate) cutoffs: Vec<CutoffEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CutoffEntry {
    pub(crate) grade_point: GradePoint,
    pub(crate) letter: &'static str,
    pub(crate) min_percent: f64,
}

pub(crate) fn with_grading_routes<R>(service: Arc<GradingService<R>>) -> axum::Router
where
    R: SemesterRepository + 'static,
{
    grading_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/cohort", axum::routing::post(cohort_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn cohort_endpoint(
    Json(payload): Json<CohortRequest>,
) -> Result<Json<CohortResponse>, AppError> {
    let CohortRequest { csv, multipliers } = payload;

    let sample = read_sample(Cursor::new(csv.into_bytes()))?;
    let stats = CohortStats::from_sample(&sample).ok_or(CohortError::Empty)?;
    let multipliers = Multipliers::with_overrides(&multipliers)?;

    Ok(Json(CohortResponse {
        sample_size: sample.len(),
        stats,
        cutoffs: cutoff_entries(&RelativeCutoffs::new(stats, &multipliers)),
    }))
}

pub(crate) fn cutoff_entries(cutoffs: &RelativeCutoffs) -> Vec<CutoffEntry> {
    cutoffs
        .entries()
        .map(|(grade_point, min_percent)| CutoffEntry {
            grade_point,
            letter: grade_point.letter(),
            min_percent,
        })
        .collect()
}
