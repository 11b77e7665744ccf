pub mod views;

use super::domain::{CourseResult, CumulativeResult, SemesterResult};
use views::{CourseRowView, CumulativeSummary, SemesterSummary, Standing};

impl CourseResult {
    pub const fn result_label(&self) -> &'static str {
        if self.passed {
            "Pass"
        } else {
            "Fail"
        }
    }

    pub fn to_view(&self) -> CourseRowView {
        CourseRowView {
            course: self.course.name.clone(),
            credit_units: self.course.credit_units.value(),
            marks: self.course.marks().map(|mark| mark.to_string()),
            total_percent: self.total_percent,
            grade_point: self.grade_point,
            letter: self.letter.clone(),
            credit_points: self.credit_points,
            result_label: self.result_label(),
        }
    }
}

impl SemesterResult {
    pub fn summary(&self, pass_average: f64) -> SemesterSummary {
        let standing = Standing::from_threshold(self.sgpa, pass_average);
        SemesterSummary {
            semester_id: self.semester_id,
            sgpa: self.sgpa,
            standing,
            standing_label: standing.label(),
            total_credit_units: self.total_credit_units,
            total_credit_points: self.total_credit_points,
            policy: self.policy.kind,
            used_fallback: self.policy.used_fallback,
            courses: self.course_results.iter().map(CourseResult::to_view).collect(),
        }
    }
}

impl CumulativeResult {
    pub fn summary(&self, pass_average: f64) -> CumulativeSummary {
        let standing = Standing::from_threshold(self.cgpa, pass_average);
        CumulativeSummary {
            semester_ids: self.semester_ids.clone(),
            cgpa: self.cgpa,
            standing,
            standing_label: standing.label(),
            total_credit_units: self.total_credit_units,
            total_credit_points: self.total_credit_points,
        }
    }
}
