use super::super::domain::{CourseResult, SemesterResult};
use super::{ExportError, COURSE_HEADERS, SEMESTER_HEADER};
use std::io::Write;

pub fn semester_label(semester_id: u8) -> String {
    format!("Semester {semester_id}")
}

/// One row per course of a single semester.
pub fn write_semester<W: Write>(writer: W, result: &SemesterResult) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COURSE_HEADERS)?;
    for course in &result.course_results {
        csv_writer.write_record(course_cells(course))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Rows for several semesters with the semester label as the leading column.
pub fn write_consolidated<W: Write>(
    writer: W,
    semesters: &[SemesterResult],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(std::iter::once(SEMESTER_HEADER).chain(COURSE_HEADERS))?;

    let mut ordered: Vec<&SemesterResult> = semesters.iter().collect();
    ordered.sort_by_key(|semester| semester.semester_id);

    for semester in ordered {
        let label = semester_label(semester.semester_id);
        for course in &semester.course_results {
            csv_writer.write_record(std::iter::once(label.clone()).chain(course_cells(course)))?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

fn course_cells(result: &CourseResult) -> [String; 10] {
    let [ec1, ec2, ec3] = result.course.marks().map(|mark| mark.to_string());
    [
        result.course.name.clone(),
        result.course.credit_units.value().to_string(),
        ec1,
        ec2,
        ec3,
        format!("{:.2}", result.total_percent),
        result.grade_point.value().to_string(),
        result.letter.clone(),
        format!("{:.2}", result.credit_points),
        result.result_label().to_string(),
    ]
}
