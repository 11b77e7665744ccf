use crate::infra::{
    attempt_flags, parse_grade_point, parse_slot, read_semester_input, InMemorySemesterRepository,
};
use crate::routes::cutoff_entries;
use clap::Args;
use grade_engine::config::AppConfig;
use grade_engine::error::AppError;
use grade_engine::grading::cohort::read_sample;
use grade_engine::grading::mapper::{Multipliers, RelativeCutoffs};
use grade_engine::grading::{
    CohortError, CohortSource, CohortStats, ComponentSlot, Course, CreditUnits, GradePoint,
    GradingConfig, GradingEngine, GradingPolicy, GradingService, GradingServiceError,
    ProjectionQuery,
    ProjectionResult, ProjectionStatus, ScoreMode, SemesterInput, SemesterRecord,
    SemesterSummary,
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ComputeArgs {
    /// JSON file holding the semester's mode, policy and courses
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Semester number the input belongs to
    #[arg(long, default_value_t = 1)]
    pub(crate) semester: u8,
    /// Write the graded semester as CSV to this path
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectArgs {
    /// JSON file holding the semester's mode, policy and courses
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Zero-based course position within the input
    #[arg(long)]
    pub(crate) course: usize,
    /// Target grade point or letter, e.g. 8 or B
    #[arg(long, value_parser = parse_grade_point)]
    pub(crate) target: GradePoint,
    /// Components still to be attempted (repeatable), e.g. --attempt ec3
    #[arg(long = "attempt", value_parser = parse_slot, required = true)]
    pub(crate) attempts: Vec<ComponentSlot>,
}

#[derive(Args, Debug)]
pub(crate) struct CohortArgs {
    /// CSV file with one score per row (score/total column or the first column)
    #[arg(long)]
    pub(crate) sample: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Grade the demo semesters against the built-in cohort sample instead of
    /// the absolute table.
    #[arg(long)]
    pub(crate) relative: bool,
}

fn grading_config() -> Result<GradingConfig, AppError> {
    Ok(AppConfig::load()?.grading)
}

fn session(config: GradingConfig) -> GradingService<InMemorySemesterRepository> {
    GradingService::new(Arc::new(InMemorySemesterRepository::default()), config)
}

pub(crate) fn run_compute(args: ComputeArgs) -> Result<(), AppError> {
    let ComputeArgs {
        input,
        semester,
        export,
    } = args;

    let config = grading_config()?;
    let semester_input = read_semester_input(&input)?;
    let service = session(config);

    let record = match service.compute(semester, &semester_input) {
        Ok(record) => record,
        Err(err) => {
            render_blocked_courses(service.engine(), &semester_input);
            return Err(err.into());
        }
    };
    render_semester(&record, service.config().pass_average);

    if let Some(path) = export {
        let csv = service.export_csv()?;
        std::fs::write(&path, csv)?;
        println!("\nExported results to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_project(args: ProjectArgs) -> Result<(), AppError> {
    let ProjectArgs {
        input,
        course,
        target,
        attempts,
    } = args;

    let engine = GradingEngine::new(grading_config()?);
    let semester_input = read_semester_input(&input)?;
    let (course, projection) = project_input_course(
        &engine,
        &semester_input,
        course,
        attempt_flags(&attempts),
        target,
    )?;

    render_projection(&course.name, &projection);
    Ok(())
}

/// Projection for one course of an input file. The other courses are not graded.
fn project_input_course(
    engine: &GradingEngine,
    input: &SemesterInput,
    course_id: usize,
    attempt_flags: [bool; 3],
    target: GradePoint,
) -> Result<(Course, ProjectionResult), GradingServiceError> {
    let course = input
        .course(course_id)
        .ok_or(GradingServiceError::CourseNotFound {
            semester_id: 1,
            course_id,
        })?;
    let projection = engine.project_course(&course, attempt_flags, target)?;
    Ok((course, projection))
}

pub(crate) fn run_cohort(args: CohortArgs) -> Result<(), AppError> {
    let file = File::open(&args.sample)?;
    let sample = read_sample(file)?;
    let stats = CohortStats::from_sample(&sample).ok_or(CohortError::Empty)?;
    render_cohort(sample.len(), stats);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = grading_config()?;
    let service = session(config);

    println!("Grade point engine demo");
    let policy = if args.relative {
        let sample = demo_cohort_sample();
        if let Some(stats) = CohortStats::from_sample(&sample) {
            render_cohort(sample.len(), stats);
        }
        GradingPolicy::Relative {
            cohort: Some(CohortSource::Sample(sample)),
            multipliers: Default::default(),
        }
    } else {
        GradingPolicy::Absolute
    };

    for (semester_id, courses) in [(1, demo_first_semester()), (2, demo_second_semester())] {
        let input = SemesterInput {
            mode: ScoreMode::Direct,
            policy: policy.clone(),
            weights: Some(DEMO_WEIGHTS),
            courses,
        };
        match service.compute(semester_id, &input) {
            Ok(record) => {
                println!();
                render_semester(&record, service.config().pass_average);
            }
            Err(err) => {
                println!("  Semester {semester_id} blocked: {err}");
                return Ok(());
            }
        }
    }

    match service.cumulative() {
        Ok(result) => {
            let summary = result.summary(service.config().pass_average);
            println!(
                "\nCGPA over semesters {:?}: {:.2} ({}) | {} units | {:.2} credit points",
                summary.semester_ids,
                summary.cgpa,
                summary.standing_label,
                summary.total_credit_units,
                summary.total_credit_points
            );
        }
        Err(err) => println!("\nCGPA unavailable: {err}"),
    }

    for target in [GradePoint::Eight, GradePoint::Ten] {
        let query = ProjectionQuery {
            semester_id: 2,
            course_id: 2,
            attempt_flags: [false, false, true],
            target_grade_point: target,
        };
        match service.project(&query) {
            Ok(projection) => render_projection("Computer Networks", &projection),
            Err(err) => println!("  Projection unavailable: {err}"),
        }
    }

    match service.export_csv() {
        Ok(csv) => println!("\nConsolidated export:\n{csv}"),
        Err(err) => println!("\nExport unavailable: {err}"),
    }

    Ok(())
}

const DEMO_WEIGHTS: [f64; 3] = [30.0, 30.0, 40.0];

fn demo_first_semester() -> Vec<Course> {
    vec![
        Course::unweighted("Engineering Mathematics", CreditUnits::FIVE)
            .with_mark(ComponentSlot::Ec1, 24.0)
            .with_mark(ComponentSlot::Ec2, 21.5)
            .with_mark(ComponentSlot::Ec3, 31.0),
        Course::unweighted("Programming Fundamentals", CreditUnits::FOUR)
            .with_mark(ComponentSlot::Ec1, 28.0)
            .with_mark(ComponentSlot::Ec2, 26.0)
            .with_mark(ComponentSlot::Ec3, 36.0),
        Course::new("Technical Writing", CreditUnits::FOUR, [20.0, 30.0, 50.0])
            .with_mark(ComponentSlot::Ec1, 12.0)
            .with_mark(ComponentSlot::Ec2, 17.0)
            .with_mark(ComponentSlot::Ec3, 24.0),
    ]
}

fn demo_second_semester() -> Vec<Course> {
    vec![
        Course::unweighted("Data Structures", CreditUnits::FIVE)
            .with_mark(ComponentSlot::Ec1, 25.0)
            .with_mark(ComponentSlot::Ec2, 28.0)
            .with_mark(ComponentSlot::Ec3, 30.0),
        Course::unweighted("Digital Logic", CreditUnits::FOUR)
            .with_mark(ComponentSlot::Ec1, 19.0)
            .with_mark(ComponentSlot::Ec2, 22.0)
            .with_mark(ComponentSlot::Ec3, 27.0),
        Course::unweighted("Computer Networks", CreditUnits::FOUR)
            .with_mark(ComponentSlot::Ec1, 25.0)
            .with_mark(ComponentSlot::Ec2, 28.0),
    ]
}

fn demo_cohort_sample() -> Vec<f64> {
    vec![
        48.0, 52.5, 57.0, 61.0, 63.5, 66.0, 68.0, 71.5, 74.0, 77.0, 81.5, 88.0,
    ]
}

fn render_semester(record: &SemesterRecord, pass_average: f64) {
    let summary: SemesterSummary = record.result.summary(pass_average);
    println!(
        "Semester {} | SGPA {:.2} ({}) | {} policy{} | computed {}",
        summary.semester_id,
        summary.sgpa,
        summary.standing_label,
        summary.policy.label(),
        if summary.used_fallback {
            " (absolute fallback)"
        } else {
            ""
        },
        record.computed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for course in &summary.courses {
        println!(
            "  - {} ({} units): {} / {} / {} -> {:.2}% | GP {} ({}) | {:.2} credit points | {}",
            course.course,
            course.credit_units,
            course.marks[0],
            course.marks[1],
            course.marks[2],
            course.total_percent,
            course.grade_point.value(),
            course.letter,
            course.credit_points,
            course.result_label
        );
    }
    println!(
        "  Totals: {} units | {:.2} credit points",
        summary.total_credit_units, summary.total_credit_points
    );
}

fn render_blocked_courses(engine: &GradingEngine, input: &SemesterInput) {
    let Ok(results) = engine.evaluate_courses(input) else {
        return;
    };
    println!("Semester blocked by invalid course configuration:");
    for (course, result) in input.courses.iter().zip(results) {
        match result {
            Ok(result) => println!("  - {}: ok ({:.2}%)", course.name, result.total_percent),
            Err(err) => println!("  - {}: {}", course.name, err),
        }
    }
}

fn render_projection(course: &str, projection: &ProjectionResult) {
    println!(
        "\nProjection for {course}: target GP {} ({:.0}%) | current {:.2} | need {:.2} | capacity {:.2} -> {}",
        projection.target_grade_point.value(),
        projection.target_percent,
        projection.current_sum,
        projection.need,
        projection.capacity,
        projection.status.label()
    );

    if projection.status != ProjectionStatus::Reachable {
        if let Some(reason) = projection.unreachable_reason {
            println!("  Reason: {reason:?}");
        }
        return;
    }

    for slot in ComponentSlot::ordered() {
        let (Some(share), Some(minimum)) = (
            projection.proportional_for(slot),
            projection.single_minimum_for(slot),
        ) else {
            continue;
        };
        println!(
            "  - {} ({}): proportional {:.2} | minimum alone {:.2}",
            slot.label(),
            slot.assessment(),
            share,
            minimum
        );
    }
}

fn render_cohort(sample_size: usize, stats: CohortStats) {
    println!(
        "Cohort of {sample_size}: mean {:.2} | std dev {:.2}",
        stats.mean, stats.std_dev
    );
    let cutoffs = RelativeCutoffs::new(stats, &Multipliers::default());
    for entry in cutoff_entries(&cutoffs) {
        println!(
            "  - {:>2} ({:<2}) from {:.2}%",
            entry.grade_point.value(),
            entry.letter,
            entry.min_percent
        );
    }
}
