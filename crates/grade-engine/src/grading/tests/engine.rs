use super::common::*;
use std::collections::BTreeMap;

use crate::grading::domain::{ClassHighest, ComponentSlot, Course, CreditUnits, GradePoint};
use crate::grading::error::{ConfigurationIssue, GradingError};
use crate::grading::mapper::{CohortSource, GradeMapper, GradingPolicy};
use crate::grading::projection::ProjectionStatus;
use crate::grading::{PolicyKind, ScoreMode};

#[test]
fn fully_marked_course_maps_to_a_minus() {
    let engine = engine();
    let course = course("Data Structures", CreditUnits::FOUR, [25.0, 28.0, 30.0]);

    let result = engine
        .compute_course(&course, ScoreMode::Direct, &GradeMapper::Absolute)
        .expect("valid course");

    assert_close(result.total_percent, 83.0);
    assert_eq!(result.grade_point, GradePoint::Nine);
    assert_eq!(result.letter, "A-");
    assert_eq!(result.credit_points, 36.0);
    assert!(result.passed);
}

#[test]
fn course_below_pass_threshold_fails() {
    let engine = engine();
    let course = course("Statistics", CreditUnits::FIVE, [10.0, 10.0, 18.0]);

    let result = engine
        .compute_course(&course, ScoreMode::Direct, &GradeMapper::Absolute)
        .expect("valid course");

    assert_eq!(result.grade_point, GradePoint::Four);
    assert_eq!(result.credit_points, 20.0);
    assert!(!result.passed);
}

#[test]
fn invalid_weights_block_the_course_and_the_semester() {
    let engine = engine();
    let input = invalid_weight_input();

    let error = engine
        .compute_semester(1, &input)
        .expect_err("weights sum to 90");
    match error {
        GradingError::InvalidConfiguration { course, issue } => {
            assert_eq!(course, "Signals");
            assert_eq!(issue, ConfigurationIssue::WeightSum { sum: 90.0 });
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }

    let per_course = engine.evaluate_courses(&input).expect("policy resolves");
    assert_eq!(per_course.len(), 2);
    assert!(per_course[0].is_ok());
    assert!(matches!(
        per_course[1],
        Err(GradingError::InvalidConfiguration { .. })
    ));
}

#[test]
fn semester_wide_weights_apply_unless_a_course_sets_its_own() {
    let engine = engine();
    let mut input = semester_input(vec![
        Course::unweighted("Compilers", CreditUnits::FOUR)
            .with_mark(ComponentSlot::Ec1, 25.0)
            .with_mark(ComponentSlot::Ec2, 28.0)
            .with_mark(ComponentSlot::Ec3, 30.0),
        Course::new("Design Studio", CreditUnits::FIVE, [50.0, 25.0, 25.0])
            .with_mark(ComponentSlot::Ec1, 45.0),
    ]);
    input.weights = Some(WEIGHTS);

    let result = engine.compute_semester(1, &input).expect("semester computes");
    assert_close(result.course_results[0].total_percent, 83.0);
    assert_eq!(result.course_results[0].grade_point, GradePoint::Nine);
    assert_close(result.course_results[1].total_percent, 45.0);

    let resolved = input.course(0).expect("course exists");
    assert_eq!(
        resolved.components.map(|component| component.weight),
        WEIGHTS.map(Some)
    );
    assert!(input.course(2).is_none());

    input.weights = None;
    let error = engine
        .compute_semester(1, &input)
        .expect_err("Compilers has no weights");
    assert_eq!(
        error,
        GradingError::InvalidConfiguration {
            course: "Compilers".to_string(),
            issue: ConfigurationIssue::MissingWeight {
                slot: ComponentSlot::Ec1
            },
        }
    );
}

#[test]
fn semester_sgpa_weights_grade_points_by_units() {
    let engine = engine();
    let result = engine
        .compute_semester(1, &first_semester())
        .expect("semester computes");

    // 9*4 + 8*5 + 6*4 over 13 units
    assert_eq!(result.total_credit_units, 13);
    assert_eq!(result.total_credit_points, 100.0);
    assert_close(result.sgpa, 100.0 / 13.0);
    assert_eq!(result.policy.kind, PolicyKind::Absolute);
    assert!(!result.policy.used_fallback);
}

#[test]
fn empty_semester_is_undefined_not_zero() {
    let engine = engine();
    let error = engine
        .compute_semester(2, &semester_input(Vec::new()))
        .expect_err("no credit units");
    assert_eq!(error, GradingError::DivisionUndefined);
}

#[test]
fn semester_numbers_outside_configured_range_are_rejected() {
    let engine = engine();
    for semester_id in [0, 4] {
        let error = engine
            .compute_semester(semester_id, &first_semester())
            .expect_err("out of range");
        assert_eq!(
            error,
            GradingError::InvalidSemester {
                semester_id,
                max: 3
            }
        );
    }
}

#[test]
fn normalize_by_highest_uses_per_component_scaling() {
    let engine = engine();
    let mut input = semester_input(vec![course(
        "Thermodynamics",
        CreditUnits::FOUR,
        [20.0, 15.0, 30.0],
    )
    .with_class_highest(ClassHighest::PerComponent([25.0, 20.0, 32.0]))]);
    input.mode = ScoreMode::NormalizeByHighest;

    let result = engine.compute_semester(1, &input).expect("semester computes");
    let course = &result.course_results[0];

    // 20/25*30 + 15/20*30 + 30/32*40
    assert_close(course.total_percent, 24.0 + 22.5 + 37.5);
    assert_eq!(course.grade_point, GradePoint::Nine);
}

#[test]
fn normalize_by_highest_without_highest_is_a_configuration_error() {
    let engine = engine();
    let mut input = first_semester();
    input.mode = ScoreMode::NormalizeByHighest;

    let error = engine.compute_semester(1, &input).expect_err("missing highest");
    assert!(matches!(
        error,
        GradingError::InvalidConfiguration {
            issue: ConfigurationIssue::MissingClassHighest,
            ..
        }
    ));
}

#[test]
fn zero_course_highest_is_rejected_instead_of_defaulted() {
    let engine = engine();
    let mut input = semester_input(vec![course(
        "Optics",
        CreditUnits::FIVE,
        [20.0, 20.0, 20.0],
    )
    .with_class_highest(ClassHighest::Course(0.0))]);
    input.mode = ScoreMode::NormalizeByHighest;

    let error = engine.compute_semester(1, &input).expect_err("zero highest");
    assert_eq!(
        error,
        GradingError::InvalidConfiguration {
            course: "Optics".to_string(),
            issue: ConfigurationIssue::NonPositiveCourseHighest { value: 0.0 },
        }
    );
}

#[test]
fn relative_policy_grades_against_cohort() {
    let engine = engine();
    let mut input = first_semester();
    input.policy = GradingPolicy::Relative {
        cohort: Some(CohortSource::Stats {
            mean: 55.0,
            std_dev: 10.0,
        }),
        multipliers: BTreeMap::new(),
    };

    let result = engine.compute_semester(1, &input).expect("semester computes");
    let grades: Vec<GradePoint> = result
        .course_results
        .iter()
        .map(|course| course.grade_point)
        .collect();

    // cutoffs: A 70, A- 65, B 60, B- 55, C 50
    assert_eq!(
        grades,
        vec![GradePoint::Ten, GradePoint::Ten, GradePoint::Six]
    );
    assert_eq!(result.policy.kind, PolicyKind::Relative);
    assert!(!result.policy.used_fallback);
}

#[test]
fn relative_policy_without_stats_reports_fallback() {
    let engine = engine();
    let mut input = first_semester();
    input.policy = GradingPolicy::Relative {
        cohort: None,
        multipliers: BTreeMap::new(),
    };

    let relative = engine.compute_semester(1, &input).expect("semester computes");
    let absolute = engine
        .compute_semester(1, &first_semester())
        .expect("semester computes");

    assert!(relative.policy.used_fallback);
    assert_eq!(relative.sgpa, absolute.sgpa);
}

#[test]
fn unknown_multiplier_letter_is_rejected() {
    let engine = engine();
    let mut multipliers = BTreeMap::new();
    multipliers.insert("Z".to_string(), 1.0);
    let mut input = first_semester();
    input.policy = GradingPolicy::Relative {
        cohort: Some(CohortSource::Sample(vec![40.0, 60.0, 80.0])),
        multipliers,
    };

    assert_eq!(
        engine.compute_semester(1, &input),
        Err(GradingError::UnknownLetter("Z".to_string()))
    );
}

#[test]
fn projection_for_pending_final_is_reachable() {
    let engine = engine();
    let course = course_awaiting_final("Operating Systems", 25.0, 28.0);

    let projection = engine
        .project_course(&course, [false, false, true], GradePoint::Eight)
        .expect("valid course");

    assert_eq!(projection.status, ProjectionStatus::Reachable);
    assert_eq!(projection.target_percent, 70.0);
    assert_eq!(projection.need, 17.0);
    assert_eq!(projection.capacity, 40.0);
    assert_eq!(projection.single_minimum_for(ComponentSlot::Ec3), Some(17.0));
    assert_eq!(projection.proportional_for(ComponentSlot::Ec3), Some(17.0));
}

#[test]
fn projection_beyond_capacity_is_unreachable() {
    let engine = engine();
    let course = course_awaiting_final("Operating Systems", 10.0, 10.0);

    let projection = engine
        .project_course(&course, [false, false, true], GradePoint::Ten)
        .expect("valid course");

    assert_eq!(projection.status, ProjectionStatus::Unreachable);
    assert_eq!(projection.need, 70.0);
    assert_eq!(projection.capacity, 40.0);
    assert!(projection.single_component_minimums.is_none());
}

#[test]
fn projection_is_idempotent() {
    let engine = engine();
    let course = course_awaiting_final("Operating Systems", 12.5, 19.0);

    let first = engine
        .project_course(&course, [false, false, true], GradePoint::Seven)
        .expect("valid course");
    let second = engine
        .project_course(&course, [false, false, true], GradePoint::Seven)
        .expect("valid course");

    assert_eq!(first, second);
}

#[test]
fn projection_on_misconfigured_course_is_not_unreachable() {
    let engine = engine();
    let course = Course::new("Signals", CreditUnits::FOUR, [30.0, 20.0, 40.0]);

    let error = engine
        .project_course(&course, [true, true, true], GradePoint::Six)
        .expect_err("invalid weights");
    assert!(matches!(error, GradingError::InvalidConfiguration { .. }));
}
