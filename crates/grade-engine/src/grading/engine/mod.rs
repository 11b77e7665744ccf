mod config;

pub use config::GradingConfig;

use super::aggregate::{aggregate_cumulative, CreditTotals};
use super::domain::{
    AppliedPolicy, Course, CourseResult, CumulativeResult, GradePoint, ScoreMode, SemesterResult,
};
use super::error::GradingError;
use super::mapper::{map_grade, GradeMapper, GradingPolicy};
use super::normalizer::{normalize, validate_components};
use super::projection::{project, ProjectionResult};
use serde::{Deserialize, Serialize};

/// Full snapshot of one semester's inputs as supplied by the caller.
///
/// `weights` applies to every component that does not carry its own weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterInput {
    #[serde(default)]
    pub mode: ScoreMode,
    #[serde(default)]
    pub policy: GradingPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<[f64; 3]>,
    pub courses: Vec<Course>,
}

impl SemesterInput {
    /// Course at `index` with the semester-wide weights filled in.
    pub fn course(&self, index: usize) -> Option<Course> {
        self.courses
            .get(index)
            .map(|course| course.with_default_weights(self.weights.as_ref()))
    }

    fn resolved_courses(&self) -> impl Iterator<Item = Course> + '_ {
        self.courses
            .iter()
            .map(|course| course.with_default_weights(self.weights.as_ref()))
    }
}

/// Stateless engine applying the grading configuration to course snapshots.
#[derive(Debug, Clone, Default)]
pub struct GradingEngine {
    config: GradingConfig,
}

impl GradingEngine {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn validate_course(&self, course: &Course) -> Result<[f64; 3], GradingError> {
        validate_components(&course.components, self.config.weight_tolerance)
            .map_err(|issue| GradingError::invalid(&course.name, issue))
    }

    pub fn compute_course(
        &self,
        course: &Course,
        mode: ScoreMode,
        mapper: &GradeMapper,
    ) -> Result<CourseResult, GradingError> {
        let weights = self.validate_course(course)?;
        let total_percent = normalize(
            &course.components,
            &weights,
            course.class_highest.as_ref(),
            mode,
        )
        .map_err(|issue| GradingError::invalid(&course.name, issue))?;

        let (grade_point, letter) = map_grade(total_percent, mapper);
        let credit_points = f64::from(grade_point.value()) * f64::from(course.credit_units.value());

        Ok(CourseResult {
            course: course.clone(),
            total_percent,
            grade_point,
            letter: letter.to_string(),
            credit_points,
            passed: f64::from(grade_point.value()) >= self.config.pass_grade_point,
        })
    }

    /// Grade every course independently so callers can show which ones are blocked.
    pub fn evaluate_courses(
        &self,
        input: &SemesterInput,
    ) -> Result<Vec<Result<CourseResult, GradingError>>, GradingError> {
        let mapper = GradeMapper::from_policy(&input.policy)?;
        Ok(input
            .resolved_courses()
            .map(|course| self.compute_course(&course, input.mode, &mapper))
            .collect())
    }

    /// Compute a semester. Any invalid course blocks the whole semester.
    pub fn compute_semester(
        &self,
        semester_id: u8,
        input: &SemesterInput,
    ) -> Result<SemesterResult, GradingError> {
        self.check_semester(semester_id)?;
        let mapper = GradeMapper::from_policy(&input.policy)?;

        let course_results = input
            .resolved_courses()
            .map(|course| self.compute_course(&course, input.mode, &mapper))
            .collect::<Result<Vec<_>, _>>()?;

        let totals = CreditTotals::from_results(&course_results);
        let sgpa = totals.average()?;

        Ok(SemesterResult {
            semester_id,
            course_results,
            sgpa,
            total_credit_units: totals.credit_units,
            total_credit_points: totals.credit_points,
            policy: AppliedPolicy {
                kind: mapper.kind(),
                used_fallback: mapper.used_fallback(),
            },
        })
    }

    pub fn cumulative(
        &self,
        semesters: &[SemesterResult],
    ) -> Result<CumulativeResult, GradingError> {
        aggregate_cumulative(semesters, self.config.cumulative_min_semesters)
    }

    /// Projection over a course's entered marks. Invalid course setups are
    /// reported as configuration errors rather than unreachable targets.
    pub fn project_course(
        &self,
        course: &Course,
        attempt_flags: [bool; 3],
        target: GradePoint,
    ) -> Result<ProjectionResult, GradingError> {
        let weights = self.validate_course(course)?;
        Ok(project(course.marks(), weights, attempt_flags, target))
    }

    pub fn check_semester(&self, semester_id: u8) -> Result<(), GradingError> {
        if semester_id == 0 || semester_id > self.config.max_semesters {
            return Err(GradingError::InvalidSemester {
                semester_id,
                max: self.config.max_semesters,
            });
        }
        Ok(())
    }

    pub fn passes_average(&self, average: f64) -> bool {
        average >= self.config.pass_average
    }
}
