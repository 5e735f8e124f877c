//! Retain CLI
//!
//! Command-line front end for the scheduling engine. Item records are plain
//! JSON files; reviews are appended to a JSON Lines log.

mod store;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use retain_core::{
    format_duration, load_parameters, retrievability, FSRSParameters, FSRSScheduler, MemoryState,
    Rating,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Retain - spaced repetition scheduler
#[derive(Parser)]
#[command(name = "retain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Schedule reviews for vocabulary cards and conjugation drills")]
#[command(long_about = "Retain schedules flashcard reviews with the FSRS-5 memory model.\n\nEach item is a JSON file holding its memory record; `review` replaces it atomically.")]
struct Cli {
    /// Parameter file (overrides RETAIN_CONFIG and the platform default)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate at this instant instead of the wall clock (RFC 3339)
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty item record
    New {
        /// Write the record here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show what each rating would do to an item
    Preview {
        /// Item file
        file: PathBuf,
        /// Print the four outcomes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a review and reschedule the item
    Review {
        /// Item file (replaced in place)
        file: PathBuf,
        /// again, hard, good, easy or 1-4
        #[arg(long)]
        rating: String,
        /// Append the review log entry to this JSON Lines file
        #[arg(long)]
        log: Option<PathBuf>,
        /// Print the outcome without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective scheduler parameters
    Config {
        /// Only validate, print nothing but the verdict
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);
    let params = load_parameters(cli.config.as_deref())?;

    match cli.command {
        Commands::New { output } => run_new(params, now, output.as_deref()),
        Commands::Preview { file, json } => run_preview(params, now, &file, json),
        Commands::Review {
            file,
            rating,
            log,
            dry_run,
        } => run_review(params, now, &file, &rating, log.as_deref(), dry_run),
        Commands::Config { check } => run_config(params, check),
    }
}

/// `RUST_LOG` as given, or warnings only when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

/// Run new command
fn run_new(params: FSRSParameters, now: DateTime<Utc>, output: Option<&Path>) -> anyhow::Result<()> {
    let scheduler = FSRSScheduler::new(params)?;
    let item = scheduler.new_item(now);

    match output {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            store::write_item(path, &item)?;
            println!("{} {}", "Created".green().bold(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&item)?),
    }
    Ok(())
}

/// Run preview command
fn run_preview(params: FSRSParameters, now: DateTime<Utc>, file: &Path, json: bool) -> anyhow::Result<()> {
    let scheduler = FSRSScheduler::new(params)?;
    let item = store::read_item(file)?;
    let preview = scheduler.preview(&item, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!("{}", "=== Review Preview ===".cyan().bold());
    print_item_summary(&scheduler, &item, now);
    println!();

    for (rating, outcome) in preview.iter() {
        println!(
            "  {:<6} {:>6}  {} {}  {} {:.2}  {} {:.2}",
            colored_rating(rating),
            format_duration(outcome.interval()),
            "->".dimmed(),
            outcome.memory.state,
            "S".dimmed(),
            outcome.memory.stability,
            "D".dimmed(),
            outcome.memory.difficulty,
        );
    }
    Ok(())
}

/// Run review command
fn run_review(
    params: FSRSParameters,
    now: DateTime<Utc>,
    file: &Path,
    rating: &str,
    log: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let scheduler = FSRSScheduler::new(params)?;
    let rating: Rating = rating.parse()?;
    // Held across read, write and log append so concurrent reviews queue up
    let _lock = if dry_run {
        None
    } else {
        Some(store::lock_item(file)?)
    };
    let item = store::read_item(file)?;
    let result = scheduler.commit(&item, rating, now)?;

    if dry_run {
        println!("{}", "Dry run - nothing written".yellow().bold());
    } else {
        store::write_item(file, &result.memory)?;
        if let Some(log_path) = log {
            store::append_log(log_path, &result.log)
                .context("Item was updated but the log entry could not be written")?;
        }
        info!(file = %file.display(), rating = %rating, "Review recorded");
    }

    println!(
        "{} {} {} {}",
        colored_rating(rating),
        "->".dimmed(),
        result.memory.state.to_string().white().bold(),
        format!("next review in {}", format_duration(result.interval())).dimmed(),
    );
    println!(
        "{}: {}",
        "Due".white().bold(),
        result.memory.due.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "{}: {:.2}  {}: {:.2}  {}: {}  {}: {}",
        "Stability".white().bold(),
        result.memory.stability,
        "Difficulty".white().bold(),
        result.memory.difficulty,
        "Reps".white().bold(),
        result.memory.reps,
        "Lapses".white().bold(),
        result.memory.lapses,
    );
    Ok(())
}

/// Run config command
fn run_config(params: FSRSParameters, check: bool) -> anyhow::Result<()> {
    params.validate()?;

    if check {
        println!("{} parameters {}", "OK".green().bold(), params.version);
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn print_item_summary(scheduler: &FSRSScheduler, item: &MemoryState, now: DateTime<Utc>) {
    println!("{}: {}", "State".white().bold(), item.state);
    println!("{}: {} ({} lapses)", "Reviews".white().bold(), item.reps, item.lapses);
    if item.is_new() {
        return;
    }
    let elapsed = scheduler.elapsed_days(item, now);
    println!(
        "{}: {:.1}%  after {} days",
        "Recall".white().bold(),
        retrievability(elapsed as f64, item.stability) * 100.0,
        elapsed
    );
}

fn colored_rating(rating: Rating) -> colored::ColoredString {
    let label = format!("{:<5}", rating.as_str());
    match rating {
        Rating::Again => label.red().bold(),
        Rating::Hard => label.yellow().bold(),
        Rating::Good => label.green().bold(),
        Rating::Easy => label.blue().bold(),
    }
}
