use super::domain::ComponentSlot;

/// Reasons a course configuration cannot be graded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationIssue {
    #[error("component weights sum to {sum:.2}, expected 100")]
    WeightSum { sum: f64 },
    #[error("{slot} weight {weight} must be a finite, non-negative percentage")]
    InvalidWeight { slot: ComponentSlot, weight: f64 },
    #[error("{slot} has no weight and the semester sets no default weights")]
    MissingWeight { slot: ComponentSlot },
    #[error("{slot} mark {mark} is outside 0..={weight}")]
    MarkOutOfRange {
        slot: ComponentSlot,
        mark: f64,
        weight: f64,
    },
    #[error("class highest {value} must be greater than zero")]
    NonPositiveCourseHighest { value: f64 },
    #[error("{slot} class highest {value} must be greater than zero")]
    NonPositiveComponentHighest { slot: ComponentSlot, value: f64 },
    #[error("normalizing by class highest requires a class highest value")]
    MissingClassHighest,
}

/// Failures raised by the grading engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradingError {
    #[error("invalid configuration for course '{course}': {issue}")]
    InvalidConfiguration {
        course: String,
        issue: ConfigurationIssue,
    },
    #[error("grade point average is undefined: there are no credit units to aggregate")]
    DivisionUndefined,
    #[error(
        "cumulative average unavailable: {computed} semester(s) computed, at least {required} required"
    )]
    CumulativeUnavailable { computed: usize, required: usize },
    #[error("semester {semester_id} is outside the configured range 1..={max}")]
    InvalidSemester { semester_id: u8, max: u8 },
    #[error("unknown grade letter '{0}' in relative multiplier overrides")]
    UnknownLetter(String),
}

impl GradingError {
    pub(crate) fn invalid(course: &str, issue: ConfigurationIssue) -> Self {
        Self::InvalidConfiguration {
            course: course.to_string(),
            issue,
        }
    }
}
