use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{CumulativeResult, GradePoint, SemesterResult};
use super::engine::{GradingConfig, GradingEngine, SemesterInput};
use super::error::GradingError;
use super::export::{write_consolidated, write_semester, ExportError};
use super::projection::ProjectionResult;
use super::repository::{RepositoryError, SemesterRecord, SemesterRepository};

/// Projection request against a course already stored in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionQuery {
    pub semester_id: u8,
    /// Zero-based position of the course within the semester.
    pub course_id: usize,
    pub attempt_flags: [bool; 3],
    pub target_grade_point: GradePoint,
}

/// Service composing the grading engine with the session store.
pub struct GradingService<R> {
    engine: Arc<GradingEngine>,
    repository: Arc<R>,
}

impl<R> GradingService<R>
where
    R: SemesterRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: GradingConfig) -> Self {
        Self {
            engine: Arc::new(GradingEngine::new(config)),
            repository,
        }
    }

    pub fn engine(&self) -> &GradingEngine {
        &self.engine
    }

    pub fn config(&self) -> &GradingConfig {
        self.engine.config()
    }

    /// Compute a semester and overwrite whatever the session held for it.
    pub fn compute(
        &self,
        semester_id: u8,
        input: &SemesterInput,
    ) -> Result<SemesterRecord, GradingServiceError> {
        let result = match self.engine.compute_semester(semester_id, input) {
            Ok(result) => result,
            Err(error) => {
                warn!(semester_id, %error, "semester computation blocked");
                return Err(error.into());
            }
        };

        let record = SemesterRecord {
            result,
            computed_at: Utc::now(),
        };
        let replaced = self.repository.store(record.clone())?;

        info!(
            semester_id,
            sgpa = record.result.sgpa,
            courses = record.result.course_results.len(),
            replaced = replaced.is_some(),
            "semester computed"
        );
        Ok(record)
    }

    pub fn get(&self, semester_id: u8) -> Result<SemesterRecord, GradingServiceError> {
        self.engine.check_semester(semester_id)?;
        self.repository
            .fetch(semester_id)?
            .ok_or(GradingServiceError::SemesterNotFound(semester_id))
    }

    pub fn semesters(&self) -> Result<Vec<SemesterResult>, GradingServiceError> {
        Ok(self
            .repository
            .all()?
            .into_iter()
            .map(|record| record.result)
            .collect())
    }

    pub fn cumulative(&self) -> Result<CumulativeResult, GradingServiceError> {
        let semesters = self.semesters()?;
        Ok(self.engine.cumulative(&semesters)?)
    }

    pub fn project(&self, query: &ProjectionQuery) -> Result<ProjectionResult, GradingServiceError> {
        let record = self.get(query.semester_id)?;
        let course = record
            .result
            .course_results
            .get(query.course_id)
            .map(|result| &result.course)
            .ok_or(GradingServiceError::CourseNotFound {
                semester_id: query.semester_id,
                course_id: query.course_id,
            })?;

        let projection =
            self.engine
                .project_course(course, query.attempt_flags, query.target_grade_point)?;
        debug!(
            semester_id = query.semester_id,
            course = %course.name,
            status = projection.status.label(),
            need = projection.need,
            "projection evaluated"
        );
        Ok(projection)
    }

    /// Clear the session, returning how many semesters were dropped.
    pub fn reset(&self) -> Result<usize, GradingServiceError> {
        let removed = self.repository.clear()?;
        info!(removed, "session results cleared");
        Ok(removed)
    }

    /// CSV export of the session. Several semesters get a leading semester column.
    pub fn export_csv(&self) -> Result<String, GradingServiceError> {
        let semesters = self.semesters()?;
        let mut buffer = Vec::new();
        match semesters.as_slice() {
            [single] => write_semester(&mut buffer, single)?,
            all => write_consolidated(&mut buffer, all)?,
        }
        String::from_utf8(buffer).map_err(|_| GradingServiceError::Export(ExportError::Encoding))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GradingServiceError {
    #[error(transparent)]
    Grading(#[from] GradingError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("semester {0} has not been computed")]
    SemesterNotFound(u8),
    #[error("semester {semester_id} has no course {course_id}")]
    CourseNotFound { semester_id: u8, course_id: usize },
}
