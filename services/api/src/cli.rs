use crate::demo::{
    run_cohort, run_compute, run_demo, run_project, CohortArgs, ComputeArgs, DemoArgs,
    ProjectArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use grade_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Grade Point Engine",
    about = "Compute SGPA/CGPA and target projections from component marks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grade a semester from a JSON input file
    Compute(ComputeArgs),
    /// Show the marks a course still needs for a target grade point
    Project(ProjectArgs),
    /// Print cohort statistics and relative cutoffs for a CSV sample
    Cohort(CohortArgs),
    /// Walk through two sample semesters, the CGPA and a projection
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Compute(args) => run_compute(args),
        Command::Project(args) => run_project(args),
        Command::Cohort(args) => run_cohort(args),
        Command::Demo(args) => run_demo(args),
    }
}
