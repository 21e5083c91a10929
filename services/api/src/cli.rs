use crate::report::{run_export, run_summary, ExportArgs, SummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use review_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Review Insights",
    about = "Serve and inspect AI-evaluated interview reviews from the command line",
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
    /// Walk the review hierarchy down to one run and print its summary
    Summary(SummaryArgs),
    /// Write the per-interview breakdown of a run as CSV
    Export(ExportArgs),
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
        Command::Summary(args) => run_summary(args).await,
        Command::Export(args) => run_export(args).await,
    }
}
