//! Grade-point engine: score normalization, grade mapping, SGPA/CGPA
//! aggregation and target projection, plus the session-facing service,
//! HTTP router and CSV export built around it.
//!
//! The engine functions are pure. Session state lives behind
//! [`SemesterRepository`], owned by the caller.

pub mod aggregate;
pub mod cohort;
pub mod domain;
mod engine;
pub mod error;
pub mod export;
pub mod mapper;
pub mod normalizer;
pub mod projection;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate_cumulative, aggregate_semester, CreditTotals};
pub use cohort::{CohortError, CohortStats};
pub use domain::{
    AppliedPolicy, ClassHighest, Component, ComponentSlot, Course, CourseResult, CreditUnits,
    CumulativeResult, DomainValueError, GradePoint, Mark, PolicyKind, ScoreMode, SemesterResult,
};
pub use engine::{GradingConfig, GradingEngine, SemesterInput};
pub use error::{ConfigurationIssue, GradingError};
pub use export::{ExportError, ExportedRow};
pub use mapper::{map_grade, CohortSource, GradeMapper, GradingPolicy};
pub use normalizer::normalize;
pub use projection::{project, ProjectionResult, ProjectionStatus};
pub use report::views::{CumulativeSummary, SemesterSummary, Standing};
pub use repository::{RepositoryError, SemesterRecord, SemesterRepository};
pub use router::grading_router;
pub use service::{GradingService, GradingServiceError, ProjectionQuery};
