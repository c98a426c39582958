//! Command-line interface.
//!
//! The CLI is the controlling context for the engine: it assembles a
//! [`RunConfig`] from flags and the optional configuration file, starts the
//! background run, renders its event stream and progress bar, wires Ctrl-C
//! to cooperative cancellation, and refreshes the statistics after every
//! terminal state.

use crate::config::OrganizeConfig;
use crate::output::OutputFormatter;
use crate::run::{self, RunConfig, RunEvent, RunTermination};
use crate::stats;
use crate::transfer::TransferMode;
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "downsort",
    version,
    about = "Sort the top-level entries of a downloads folder into per-category destinations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the source's top-level entries and move or copy them into
    /// the configured destination directories.
    Organize {
        /// Source directory (default: configured value, then ~/Downloads).
        source: Option<PathBuf>,
        /// Configuration file (default: <source>/.downsort.toml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Whether to move or copy entries (default: move).
        #[arg(short, long, value_enum)]
        mode: Option<TransferMode>,
        /// Destination for images and videos.
        #[arg(long, value_name = "DIR")]
        images_videos: Option<PathBuf>,
        /// Destination for audio files.
        #[arg(long, value_name = "DIR")]
        audio: Option<PathBuf>,
        /// Destination for installers and packages.
        #[arg(long, value_name = "DIR")]
        setup: Option<PathBuf>,
        /// Destination for documents.
        #[arg(long, value_name = "DIR")]
        documents: Option<PathBuf>,
        /// Destination for archives.
        #[arg(long, value_name = "DIR")]
        compressed: Option<PathBuf>,
        /// Destination for everything else, folders included.
        #[arg(long, value_name = "DIR")]
        other: Option<PathBuf>,
    },
    /// Report per-category size and count statistics without moving
    /// anything.
    Stats {
        /// Directory to scan (default: configured value, then ~/Downloads).
        source: Option<PathBuf>,
        /// Configuration file (default: <source>/.downsort.toml if present).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

/// Runs the parsed command. Errors are user-facing messages; the caller
/// turns them into a non-zero exit.
pub fn run_cli(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Organize {
            source,
            config,
            mode,
            images_videos,
            audio,
            setup,
            documents,
            compressed,
            other,
        } => {
            let flags = DestinationFlags {
                images_videos,
                audio,
                setup,
                documents,
                compressed,
                other,
            };
            organize(source, config.as_deref(), mode, flags)
        }
        Command::Stats {
            source,
            config,
            json,
        } => show_stats(source, config.as_deref(), json),
    }
}

struct DestinationFlags {
    images_videos: Option<PathBuf>,
    audio: Option<PathBuf>,
    setup: Option<PathBuf>,
    documents: Option<PathBuf>,
    compressed: Option<PathBuf>,
    other: Option<PathBuf>,
}

fn default_source() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads the configuration: an explicit `--config` path must exist; without
/// one, `.downsort.toml` is probed next to the source (flag value or the
/// default), and absence simply means defaults.
fn load_config(explicit: Option<&Path>, source_flag: Option<&Path>) -> Result<OrganizeConfig, String> {
    if let Some(path) = explicit {
        return OrganizeConfig::load(path).map_err(|e| e.to_string());
    }
    let probe_dir = source_flag.map(Path::to_path_buf).unwrap_or_else(default_source);
    let candidate = probe_dir.join(OrganizeConfig::DEFAULT_FILE_NAME);
    if candidate.exists() {
        OrganizeConfig::load(&candidate).map_err(|e| e.to_string())
    } else {
        Ok(OrganizeConfig::default())
    }
}

fn organize(
    source_flag: Option<PathBuf>,
    config_path: Option<&Path>,
    mode_flag: Option<TransferMode>,
    flags: DestinationFlags,
) -> Result<(), String> {
    let config = load_config(config_path, source_flag.as_deref())?;

    let source = source_flag
        .or_else(|| config.source.clone())
        .unwrap_or_else(default_source);
    let mode = mode_flag.or(config.mode).unwrap_or(TransferMode::Move);

    let mut destinations = config.destinations.clone();
    if flags.images_videos.is_some() {
        destinations.images_videos = flags.images_videos;
    }
    if flags.audio.is_some() {
        destinations.audio = flags.audio;
    }
    if flags.setup.is_some() {
        destinations.setup = flags.setup;
    }
    if flags.documents.is_some() {
        destinations.documents = flags.documents;
    }
    if flags.compressed.is_some() {
        destinations.compressed = flags.compressed;
    }
    if flags.other.is_some() {
        destinations.other = flags.other;
    }

    let run_config = RunConfig {
        source: source.clone(),
        mode,
        destinations: destinations.resolve().map_err(|e| e.to_string())?,
        filters: config.filters.compile().map_err(|e| e.to_string())?,
    };

    OutputFormatter::info(&format!("Organizing contents of: {}", source.display()));
    let handle = run::start_run(run_config).map_err(|e| e.to_string())?;

    // Ctrl-C becomes a cooperative cancel: the in-flight item finishes,
    // then the run stops at the next item boundary.
    let canceller = handle.canceller();
    if let Err(err) = ctrlc::set_handler(move || canceller.cancel()) {
        OutputFormatter::warning(&format!("Ctrl-C handler unavailable: {err}"));
    }

    let mut bar: Option<ProgressBar> = None;
    let termination = loop {
        match handle.events().recv() {
            Ok(RunEvent::Item(outcome)) => {
                let (processed, total) = handle.progress();
                let bar = bar
                    .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
                if outcome.result.is_ok() {
                    bar.println(outcome.log_line());
                } else {
                    bar.println(outcome.log_line().red().to_string());
                }
                bar.set_position(processed as u64);
            }
            Ok(RunEvent::Finished(termination)) => break termination,
            // Worker gone without a terminal event; fetch the stored result.
            Err(_) => break handle.wait(),
        }
    };
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let failed = match &termination {
        RunTermination::Completed { processed } => {
            if *processed == 0 {
                OutputFormatter::info("No items in source folder.");
            }
            OutputFormatter::success(&termination.log_line());
            false
        }
        RunTermination::Cancelled { .. } => {
            OutputFormatter::warning(&termination.log_line());
            false
        }
        RunTermination::Failed { .. } => true,
    };

    // Every terminal state refreshes the statistics.
    match stats::scan(&source) {
        Ok(report) => OutputFormatter::stats_table(&report),
        Err(err) => OutputFormatter::warning(&err.to_string()),
    }

    if failed {
        Err(termination.log_line())
    } else {
        Ok(())
    }
}

fn show_stats(
    source_flag: Option<PathBuf>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let config = load_config(config_path, source_flag.as_deref())?;
    let source = source_flag
        .or_else(|| config.source.clone())
        .unwrap_or_else(default_source);

    let report = stats::scan(&source).map_err(|e| e.to_string())?;
    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        OutputFormatter::stats_table(&report);
    }
    Ok(())
}
