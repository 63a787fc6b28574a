//! dupsweep - duplicate file finder
//!
//! Finds byte-identical files under a directory tree and optionally removes
//! the redundant copies. Candidates are bucketed by size, hashed with BLAKE3
//! on a worker pool and, on request, compared byte by byte before grouping.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actions::{ConsoleDecisions, DeletionEngine, DeletionStatus};
use crate::cli::Cli;
use crate::config::{ScanConfig, Settings};
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{print_groups, print_summary, DeletionReport, DuplicateReport};
use crate::progress::Progress;

/// Run the whole application for parsed command-line arguments.
///
/// # Errors
///
/// Returns configuration errors (bad root, size, range, pattern or settings
/// file) and failures writing to the console. Per-file problems are not
/// errors; they turn the exit code into [`ExitCode::PartialSuccess`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(cli.config.as_deref())?;
    let config = ScanConfig::from_sources(&cli, settings)?;
    log::debug!("Configuration: {:?}", config);

    let mut finder = DuplicateFinder::new(config);
    if !cli.no_progress && !cli.quiet {
        finder = finder.with_progress_callback(Arc::new(Progress::new(false)));
    }
    let (groups, summary) = finder.find_duplicates()?;

    if !cli.quiet {
        print_groups(io::stdout(), &groups).context("Failed to write duplicate listing")?;
    }

    if let Some(ref path) = cli.output {
        match DuplicateReport::new(&groups).save(path) {
            Ok(()) => log::info!("Saved results to: {}", path.display()),
            Err(e) => log::error!("Failed to save results to {}: {}", path.display(), e),
        }
    }

    let mut code = if summary.has_errors() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    };

    if cli.delete || cli.interactive {
        let decisions = ConsoleDecisions::stdio(cli.yes);
        let mut engine = DeletionEngine::new(decisions, io::stdout()).with_dry_run(cli.dry_run);
        let outcome = if cli.interactive {
            engine.run_interactive(&groups)
        } else {
            engine.run_batch(&groups)
        };
        println!("\n{}", outcome.summary());

        if let Some(ref path) = cli.delete_report {
            if outcome.status == DeletionStatus::Completed {
                match DeletionReport::new(&outcome).save(path) {
                    Ok(()) => log::info!("Report saved to: {}", path.display()),
                    Err(e) => log::error!("Failed to save report to {}: {}", path.display(), e),
                }
            }
        }

        if outcome.has_failures() {
            code = ExitCode::PartialSuccess;
        }
    } else if cli.dry_run {
        log::warn!("--dry-run has no effect without --delete or --interactive");
    }

    if !cli.quiet {
        print_summary(io::stdout(), &summary).context("Failed to write summary")?;
    }

    Ok(code)
}
