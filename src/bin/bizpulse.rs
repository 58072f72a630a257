//! bizpulse CLI
//!
//! Scores exported ERP data sets without running the server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::{style, Term};

use bizpulse::cli::{score_file, OutputFormat, OutputFormatter};

/// bizpulse CLI - financial health scoring for ERP data
#[derive(Parser)]
#[command(name = "bizpulse")]
#[command(version = bizpulse::VERSION)]
#[command(about = "Command-line interface for the bizpulse health score", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json, json-pretty)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the health report for a JSON data set
    Score {
        /// Data set with financialSummary, monthlySeries, inventory and invoices
        #[arg(short, long, env = "BIZPULSE_SEED_FILE")]
        input: PathBuf,
    },

    /// Show score thresholds and recommendations per category
    Categories,
}

fn run_command(cli: &Cli, term: &Term) -> anyhow::Result<()> {
    let mut formatter = OutputFormatter::new(cli.format);
    if cli.no_color {
        formatter = formatter.without_color();
    }

    let rendered = match &cli.command {
        Commands::Score { input } => {
            tracing::debug!("Scoring {}", input.display());
            let report = score_file(input)?;
            formatter.report(&report)?
        }
        Commands::Categories => formatter.categories()?,
    };

    term.write_line(rendered.trim_end())?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let term = Term::stdout();

    if let Err(e) = run_command(&cli, &term) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
