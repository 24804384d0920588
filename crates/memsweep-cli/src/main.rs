mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

/// Exit code for a run that finished but recorded per-file errors.
const EXIT_PARTIAL: i32 = 2;

#[derive(Parser)]
#[command(
    name = "memsweep",
    about = "Archive stale session memory and flag near-duplicate solutions for review",
    version,
    propagate_version = true
)]
struct Cli {
    /// Memory root (default: nearest memories/ directory above the cwd)
    #[arg(long, global = true, env = "MEMSWEEP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log archive moves and skipped files to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive stale artifacts and print the sweep report
    Sweep {
        /// Age in days after which an artifact is stale
        #[arg(long)]
        days: Option<u32>,

        /// Also scan knowledge documents for near-duplicate solutions
        #[arg(long)]
        consolidate: bool,

        /// Report what would move without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Similarity at or above which two solutions are flagged
        #[arg(long)]
        threshold: Option<f64>,

        /// Do not write the report file under the archive root
        #[arg(long)]
        no_report: bool,
    },

    /// Classify artifacts as stale or active without moving anything
    Scan {
        /// Age in days after which an artifact is stale
        #[arg(long)]
        days: Option<u32>,
    },

    /// List near-duplicate solutions in one knowledge document
    Duplicates {
        /// Knowledge document to inspect
        file: PathBuf,

        /// Similarity at or above which two solutions are flagged
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Check that a path stays inside memories/
    CheckPath { path: String },

    /// Show or validate .memsweep.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Sweep {
            days,
            consolidate,
            dry_run,
            threshold,
            no_report,
        } => cmd::sweep::run(
            &root,
            cmd::sweep::SweepArgs {
                days,
                consolidate,
                dry_run,
                threshold,
                no_report,
            },
            cli.json,
        )
        .map(|outcome| match outcome {
            memsweep_core::types::RunOutcome::Success => 0,
            memsweep_core::types::RunOutcome::PartialSuccess => EXIT_PARTIAL,
        }),
        Commands::Scan { days } => cmd::scan::run(&root, days, cli.json).map(|()| 0),
        Commands::Duplicates { file, threshold } => {
            cmd::duplicates::run(&root, &file, threshold, cli.json).map(|()| 0)
        }
        Commands::CheckPath { path } => cmd::check_path::run(&path, cli.json).map(|()| 0),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Print the full error chain (anyhow's alternate Display)
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
