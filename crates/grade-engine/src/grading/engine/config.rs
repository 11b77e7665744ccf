use serde::{Deserialize, Serialize};

/// Grading policy knobs that are not part of an individual request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// A course passes when its grade point is at least this value.
    pub pass_grade_point: f64,
    /// A semester or cumulative average passes at or above this value.
    pub pass_average: f64,
    /// Semesters that must be computed before a CGPA is reported.
    pub cumulative_min_semesters: usize,
    /// Highest semester number accepted by the session store.
    pub max_semesters: u8,
    pub weight_tolerance: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            pass_grade_point: 4.5,
            pass_average: 5.5,
            cumulative_min_semesters: 2,
            max_semesters: 3,
            weight_tolerance: 1e-6,
        }
    }
}
