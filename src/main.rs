use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use series_rename::rename_engine::{CollisionPolicy, ConfigBuilder, DEFAULT_MAX_FILES, RenameEngine};
use series_rename::tui::{self, RunOutcome};

#[derive(Parser, Debug)]
#[command(version, about = "Rename TV episode files to 'Series S01E05.ext'", long_about = None)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Pattern number from the analysis table (skips the prompt)
    #[arg(short, long, value_name = "N")]
    pattern: Option<usize>,

    /// Series name (skips the prompt)
    #[arg(short, long, value_name = "NAME")]
    name: Option<String>,

    /// Rename without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Show the preview but do not rename anything
    #[arg(long)]
    dry_run: bool,

    /// Print the rename plan as JSON and exit
    #[arg(long, requires_all = ["pattern", "name"])]
    json: bool,

    /// Abort when two files would get the same new name
    #[arg(long)]
    refuse_collisions: bool,

    /// Maximum number of video files to pick up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_FILES)]
    max_files: usize,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "series_rename=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: Args) -> Result<RunOutcome> {
    let collisions = if args.refuse_collisions {
        CollisionPolicy::Refuse
    } else {
        CollisionPolicy::Allow
    };

    let config = ConfigBuilder::new()
        .directory(&args.directory)
        .pattern(args.pattern)
        .series_name(args.name)
        .assume_yes(args.yes)
        .dry_run(args.dry_run)
        .json(args.json)
        .collisions(collisions)
        .max_files(args.max_files)
        .build()
        .context("invalid options")?;

    let engine = RenameEngine::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = tui::run(&engine, stdin.lock(), &mut stdout.lock())?;
    Ok(outcome)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(outcome) => {
            tracing::debug!(?outcome, "finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {:#}", "✗ Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
