mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::periods::PeriodsArgs;
use commands::report::{ReportArgs, ReportScope};
use output::CommandOutput;

/// Healthcare revenue-cycle KPI reports
#[derive(Parser)]
#[command(
    name = "rcm-kpi",
    version,
    about = "Healthcare revenue-cycle KPI reports",
    long_about = "Computes charges, payments, collection rates, days in AR and the \
                  billed/unbilled AR split from an AR analysis export, as an all-time \
                  snapshot and per configured quarter and year."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Snapshot, quarterly and yearly tables
    Report(ReportArgs),
    /// All-time snapshot table
    Snapshot(ReportArgs),
    /// Quarterly table
    Quarterly(ReportArgs),
    /// Yearly table
    Yearly(ReportArgs),
    /// Show the effective period configuration
    Periods(PeriodsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<CommandOutput, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args, ReportScope::All),
        Commands::Snapshot(args) => commands::report::run_report(args, ReportScope::Snapshot),
        Commands::Quarterly(args) => commands::report::run_report(args, ReportScope::Quarterly),
        Commands::Yearly(args) => commands::report::run_report(args, ReportScope::Yearly),
        Commands::Periods(args) => commands::periods::run_periods(args),
        Commands::Version => {
            println!("rcm-kpi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(out) => {
            output::format_output(&cli.output, &out);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
