use grade_engine::error::AppError;
use grade_engine::grading::{
    ComponentSlot, GradePoint, RepositoryError, SemesterInput, SemesterRecord, SemesterRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store. Cleared by `DELETE /api/v1/semesters`.
#[derive(Default, Clone)]
pub(crate) struct InMemorySemesterRepository {
    records: Arc<Mutex<BTreeMap<u8, SemesterRecord>>>,
}

impl InMemorySemesterRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<u8, SemesterRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SemesterRepository for InMemorySemesterRepository {
    fn store(&self, record: SemesterRecord) -> Result<Option<SemesterRecord>, RepositoryError> {
        let mut guard = self.lock()?;
        Ok(guard.insert(record.semester_id(), record))
    }

    fn fetch(&self, semester_id: u8) -> Result<Option<SemesterRecord>, RepositoryError> {
        Ok(self.lock()?.get(&semester_id).cloned())
    }

    fn all(&self) -> Result<Vec<SemesterRecord>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }
}

pub(crate) fn read_semester_input(path: &Path) -> Result<SemesterInput, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_slot(raw: &str) -> Result<ComponentSlot, String> {
    ComponentSlot::from_label(raw)
        .ok_or_else(|| format!("'{raw}' is not a component (expected EC1, EC2 or EC3)"))
}

/// Accepts a grade point (`8`) or its letter (`B`).
pub(crate) fn parse_grade_point(raw: &str) -> Result<GradePoint, String> {
    match raw.trim().parse::<u8>() {
        Ok(value) => GradePoint::try_from(value).map_err(|err| err.to_string()),
        Err(_) => GradePoint::from_letter(raw)
            .ok_or_else(|| format!("'{raw}' is not a grade point or grade letter")),
    }
}

pub(crate) fn attempt_flags(slots: &[ComponentSlot]) -> [bool; 3] {
    let mut flags = [false; 3];
    for slot in slots {
        flags[slot.index()] = true;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_points_parse_from_numbers_and_letters() {
        assert_eq!(parse_grade_point("8"), Ok(GradePoint::Eight));
        assert_eq!(parse_grade_point("a-"), Ok(GradePoint::Nine));
        assert!(parse_grade_point("3").is_err());
        assert!(parse_grade_point("Z").is_err());
    }

    #[test]
    fn attempt_flags_follow_slots() {
        let slots = ["ec2", "EC3"]
            .into_iter()
            .map(parse_slot)
            .collect::<Result<Vec<_>, _>>()
            .expect("known slots");
        assert_eq!(attempt_flags(&slots), [false, true, true]);
        assert!(parse_slot("ec4").is_err());
    }
}
