use super::super::domain::{GradePoint, PolicyKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Pass,
    Fail,
}

impl Standing {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }

    pub fn from_threshold(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseRowView {
    pub course: String,
    pub credit_units: u8,
    pub marks: [String; 3],
    pub total_percent: f64,
    pub grade_point: GradePoint,
    pub letter: String,
    pub credit_points: f64,
    pub result_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SemesterSummary {
    pub semester_id: u8,
    pub sgpa: f64,
    pub standing: Standing,
    pub standing_label: &'static str,
    pub total_credit_units: u32,
    pub total_credit_points: f64,
    pub policy: PolicyKind,
    pub used_fallback: bool,
    pub courses: Vec<CourseRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CumulativeSummary {
    pub semester_ids: Vec<u8>,
    pub cgpa: f64,
    pub standing: Standing,
    pub standing_label: &'static str,
    pub total_credit_units: u32,
    pub total_credit_points: f64,
}
