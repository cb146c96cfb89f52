use crate::demo::{run_assess, run_demo, run_stats, AssessArgs, DemoArgs, StatsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_advisor::error::AppError;
use risk_advisor::workflows::assessment::ScoringProfile;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Risk Advisor",
    about = "Score financial self-assessments and run the advisor API from the command line",
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
    /// Score a questionnaire submission read from a JSON file
    Assess(AssessArgs),
    /// Summarise the assessments recorded in the store
    Stats(StatsArgs),
    /// Score a set of sample households and print their reports
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
    /// Scoring profile (v1, v2 or v3)
    #[arg(long, value_parser = crate::infra::parse_profile)]
    pub(crate) profile: Option<ScoringProfile>,
    /// CSV file receiving one row per assessment (`memory` keeps rows in-process)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Stats(args) => run_stats(args),
        Command::Demo(args) => run_demo(args),
    }
}
