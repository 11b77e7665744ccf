use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::grading::domain::{ComponentSlot, Course, CreditUnits};
use crate::grading::engine::{GradingConfig, GradingEngine, SemesterInput};
use crate::grading::repository::{RepositoryError, SemesterRecord, SemesterRepository};
use crate::grading::{grading_router, GradingPolicy, GradingService, ScoreMode};

pub(super) const WEIGHTS: [f64; 3] = [30.0, 30.0, 40.0];

pub(super) fn grading_config() -> GradingConfig {
    GradingConfig::default()
}

pub(super) fn engine() -> GradingEngine {
    GradingEngine::new(grading_config())
}

/// Fully marked course with the standard 30/30/40 split.
pub(super) fn course(name: &str, units: CreditUnits, marks: [f64; 3]) -> Course {
    Course::new(name, units, WEIGHTS)
        .with_mark(ComponentSlot::Ec1, marks[0])
        .with_mark(ComponentSlot::Ec2, marks[1])
        .with_mark(ComponentSlot::Ec3, marks[2])
}

/// Course whose final exam is still pending.
pub(super) fn course_awaiting_final(name: &str, ec1: f64, ec2: f64) -> Course {
    Course::new(name, CreditUnits::FOUR, WEIGHTS)
        .with_mark(ComponentSlot::Ec1, ec1)
        .with_mark(ComponentSlot::Ec2, ec2)
}

pub(super) fn semester_input(courses: Vec<Course>) -> SemesterInput {
    SemesterInput {
        mode: ScoreMode::Direct,
        policy: GradingPolicy::Absolute,
        weights: None,
        courses,
    }
}

pub(super) fn first_semester() -> SemesterInput {
    semester_input(vec![
        course("Data Structures", CreditUnits::FOUR, [25.0, 28.0, 30.0]),
        course("Discrete Mathematics", CreditUnits::FIVE, [20.0, 22.0, 30.0]),
        course_awaiting_final("Operating Systems", 25.0, 28.0),
    ])
}

pub(super) fn second_semester() -> SemesterInput {
    semester_input(vec![
        course("Compilers", CreditUnits::FIVE, [28.0, 27.0, 38.0]),
        course("Databases", CreditUnits::FOUR, [18.0, 15.0, 20.0]),
    ])
}

pub(super) fn invalid_weight_input() -> SemesterInput {
    let broken = Course::new("Signals", CreditUnits::FOUR, [30.0, 20.0, 40.0])
        .with_mark(ComponentSlot::Ec1, 10.0);
    semester_input(vec![
        course("Data Structures", CreditUnits::FOUR, [25.0, 28.0, 30.0]),
        broken,
    ])
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<BTreeMap<u8, SemesterRecord>>>,
}

impl SemesterRepository for MemoryRepository {
    fn store(&self, record: SemesterRecord) -> Result<Option<SemesterRecord>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.insert(record.semester_id(), record))
    }

    fn fetch(&self, semester_id: u8) -> Result<Option<SemesterRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&semester_id).cloned())
    }

    fn all(&self) -> Result<Vec<SemesterRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }
}

pub(super) struct UnavailableRepository;

impl SemesterRepository for UnavailableRepository {
    fn store(&self, _record: SemesterRecord) -> Result<Option<SemesterRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("session expired".to_string()))
    }

    fn fetch(&self, _semester_id: u8) -> Result<Option<SemesterRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("session expired".to_string()))
    }

    fn all(&self) -> Result<Vec<SemesterRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("session expired".to_string()))
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("session expired".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<GradingService<MemoryRepository>>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = GradingService::new(Arc::new(repository.clone()), grading_config());
    (Arc::new(service), repository)
}

pub(super) fn router_with_service(service: Arc<GradingService<MemoryRepository>>) -> axum::Router {
    grading_router(service)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
