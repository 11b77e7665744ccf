use super::common::*;

use crate::grading::aggregate::{aggregate_cumulative, aggregate_semester, CreditTotals};
use crate::grading::domain::CreditUnits;
use crate::grading::error::GradingError;

fn seven_point_semester() -> crate::grading::SemesterInput {
    semester_input(
        (1..=5)
            .map(|index| {
                course(
                    &format!("Elective {index}"),
                    CreditUnits::FOUR,
                    [20.0, 20.0, 25.0],
                )
            })
            .collect(),
    )
}

fn eight_point_semester() -> crate::grading::SemesterInput {
    let mut courses = vec![course("Seminar", CreditUnits::FOUR, [25.0, 25.0, 25.0])];
    courses.extend((1..=4).map(|index| {
        course(
            &format!("Core {index}"),
            CreditUnits::FIVE,
            [25.0, 25.0, 25.0],
        )
    }));
    semester_input(courses)
}

#[test]
fn semester_average_ignores_course_order() {
    let engine = engine();
    let forward = engine
        .compute_semester(1, &first_semester())
        .expect("semester computes");

    let mut reversed_input = first_semester();
    reversed_input.courses.reverse();
    let reversed = engine
        .compute_semester(1, &reversed_input)
        .expect("semester computes");

    assert_close(forward.sgpa, reversed.sgpa);
    assert_close(
        aggregate_semester(&forward.course_results).expect("units present"),
        100.0 / 13.0,
    );
}

#[test]
fn cumulative_weights_by_units_not_by_semester() {
    let engine = engine();
    let first = engine
        .compute_semester(1, &seven_point_semester())
        .expect("semester computes");
    let second = engine
        .compute_semester(2, &eight_point_semester())
        .expect("semester computes");

    assert_eq!(first.total_credit_units, 20);
    assert_close(first.sgpa, 7.0);
    assert_eq!(second.total_credit_units, 24);
    assert_close(second.sgpa, 8.0);

    let cumulative = engine
        .cumulative(&[first, second])
        .expect("two semesters computed");

    assert_eq!(cumulative.total_credit_units, 44);
    assert_close(cumulative.total_credit_points, 332.0);
    assert_close(cumulative.cgpa, 332.0 / 44.0);
    assert!((cumulative.cgpa - 7.5).abs() > 0.04);
}

#[test]
fn cumulative_lists_semesters_in_order() {
    let engine = engine();
    let first = engine
        .compute_semester(1, &first_semester())
        .expect("semester computes");
    let second = engine
        .compute_semester(2, &second_semester())
        .expect("semester computes");

    let cumulative = engine
        .cumulative(&[second, first])
        .expect("two semesters computed");

    assert_eq!(cumulative.semester_ids, vec![1, 2]);
    assert_close(cumulative.cgpa, 174.0 / 22.0);
}

#[test]
fn cumulative_requires_minimum_semesters() {
    let engine = engine();
    let first = engine
        .compute_semester(1, &first_semester())
        .expect("semester computes");

    assert_eq!(
        engine.cumulative(&[first]),
        Err(GradingError::CumulativeUnavailable {
            computed: 1,
            required: 2
        })
    );
    assert_eq!(
        aggregate_cumulative(&[], 0),
        Err(GradingError::DivisionUndefined)
    );
}

#[test]
fn empty_totals_have_no_average() {
    let totals = CreditTotals::default();
    assert_eq!(totals.average(), Err(GradingError::DivisionUndefined));
    assert_eq!(aggregate_semester(&[]), Err(GradingError::DivisionUndefined));
}
