use super::domain::{CourseResult, CumulativeResult, SemesterResult};
use super::error::GradingError;

/// Credit-unit and credit-point totals over a set of course results.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CreditTotals {
    pub credit_units: u32,
    pub credit_points: f64,
}

impl CreditTotals {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseResult>,
    {
        results
            .into_iter()
            .fold(Self::default(), |mut totals, result| {
                totals.credit_units += u32::from(result.course.credit_units.value());
                totals.credit_points += result.credit_points;
                totals
            })
    }

    /// Credit-weighted average; undefined when no units were taken.
    pub fn average(&self) -> Result<f64, GradingError> {
        if self.credit_units == 0 {
            return Err(GradingError::DivisionUndefined);
        }
        Ok(self.credit_points / f64::from(self.credit_units))
    }
}

/// SGPA of one semester: `Σ(grade_point × units) / Σ units`.
pub fn aggregate_semester(course_results: &[CourseResult]) -> Result<f64, GradingError> {
    CreditTotals::from_results(course_results).average()
}

/// CGPA over every course of every computed semester. Unavailable until at
/// least `min_semesters` semesters have results.
pub fn aggregate_cumulative(
    semester_results: &[SemesterResult],
    min_semesters: usize,
) -> Result<CumulativeResult, GradingError> {
    if semester_results.len() < min_semesters {
        return Err(GradingError::CumulativeUnavailable {
            computed: semester_results.len(),
            required: min_semesters,
        });
    }

    let totals = CreditTotals::from_results(
        semester_results
            .iter()
            .flat_map(|semester| semester.course_results.iter()),
    );
    let cgpa = totals.average()?;

    let mut semester_ids: Vec<u8> = semester_results
        .iter()
        .map(|semester| semester.semester_id)
        .collect();
    semester_ids.sort_unstable();

    Ok(CumulativeResult {
        semester_ids,
        cgpa,
        total_credit_units: totals.credit_units,
        total_credit_points: totals.credit_points,
    })
}
