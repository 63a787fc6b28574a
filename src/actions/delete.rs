//! Batch and interactive deletion of duplicate files.
//!
//! # Overview
//!
//! [`DeletionEngine`] removes redundant members of [`DuplicateGroup`]s:
//!
//! - **Batch** ([`DeletionEngine::run_batch`]): every member except the
//!   keeper (the first path) goes, after a single confirmation. A dry run
//!   needs no confirmation and touches nothing.
//! - **Interactive** ([`DeletionEngine::run_interactive`]): for each group
//!   the user picks the member to keep, or skips the group.
//!
//! Files are removed one at a time with a plain unlink. A failure is
//! recorded as a `FAILED:` line and the run continues.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::{DeletionEngine, ScriptedDecisions};
//! use dupsweep::duplicates::DuplicateGroup;
//!
//! let groups: Vec<DuplicateGroup> = Vec::new();
//! let decisions = ScriptedDecisions::new().confirm_with(true);
//! let mut engine = DeletionEngine::new(decisions, std::io::stdout()).with_dry_run(true);
//!
//! let outcome = engine.run_batch(&groups);
//! println!("{}", outcome.summary());
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use thiserror::Error;

use super::decision::DecisionProvider;
use crate::duplicates::DuplicateGroup;

/// Error type for a single file removal.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// The file disappeared after the scan.
    #[error("file not found")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied")]
    PermissionDenied(PathBuf),

    /// Any other I/O failure.
    #[error("{source}")]
    Io {
        /// File that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The file this error is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Unlink one file.
///
/// # Errors
///
/// Returns [`DeleteError`] if the file cannot be removed.
pub fn remove_file(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;
    log::debug!("Removed {}", path.display());
    Ok(())
}

/// One line of the deletion log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// The file was removed.
    Deleted(PathBuf),
    /// The file could not be removed.
    Failed {
        /// File that was not removed
        path: PathBuf,
        /// Why it was not removed
        reason: String,
    },
    /// Dry run: the file would have been removed.
    WouldDelete(PathBuf),
    /// Interactive mode: the group with this 1-based number was left alone.
    Skipped(usize),
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted(path) => write!(f, "Deleted: {}", path.display()),
            Self::Failed { path, reason } => write!(f, "FAILED: {} ({})", path.display(), reason),
            Self::WouldDelete(path) => write!(f, "[would delete] {}", path.display()),
            Self::Skipped(number) => write!(f, "Group {number} skipped"),
        }
    }
}

/// Which deletion flow produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    /// Keep the first member of every group.
    Batch,
    /// Keeper chosen per group.
    Interactive,
}

impl DeletionMode {
    /// Heading of the deletion report.
    #[must_use]
    pub fn report_title(self) -> &'static str {
        match self {
            Self::Batch => "Duplicate File Deletion Report",
            Self::Interactive => "Interactive Deletion Report",
        }
    }

    /// Width of the `=` rule under the report heading.
    #[must_use]
    pub fn report_rule_width(self) -> usize {
        match self {
            Self::Batch => 36,
            Self::Interactive => 32,
        }
    }
}

/// How a deletion run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionStatus {
    /// Every group was processed.
    Completed,
    /// The batch confirmation was declined; nothing was touched.
    Cancelled,
}

/// Totals and log of a deletion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    /// Flow that ran
    pub mode: DeletionMode,
    /// How the run ended
    pub status: DeletionStatus,
    /// Whether this was a simulation
    pub dry_run: bool,
    /// Per-file and per-group lines, in order
    pub lines: Vec<ReportLine>,
    /// Files removed, or that would be removed in a dry run
    pub removed: usize,
    /// Bytes freed, or that would be freed in a dry run
    pub bytes: u64,
    /// Files that could not be removed
    pub failures: usize,
    /// Interactive groups left untouched
    pub skipped_groups: usize,
}

impl DeletionOutcome {
    fn new(mode: DeletionMode, dry_run: bool) -> Self {
        Self {
            mode,
            status: DeletionStatus::Completed,
            dry_run,
            lines: Vec::new(),
            removed: 0,
            bytes: 0,
            failures: 0,
            skipped_groups: 0,
        }
    }

    /// Whether any removal failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    /// Human-readable totals.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.status == DeletionStatus::Cancelled {
            return "Deletion cancelled; no files were removed".to_string();
        }
        let mut text = if self.dry_run {
            format!(
                "Total possible deletions: {}\nTotal possible freed size: {}",
                self.removed,
                ByteSize::b(self.bytes)
            )
        } else {
            format!(
                "Total deleted: {}\nTotal freed size: {}",
                self.removed,
                ByteSize::b(self.bytes)
            )
        };
        if self.failures > 0 {
            text.push_str(&format!("\nFailed: {}", self.failures));
        }
        if self.skipped_groups > 0 {
            text.push_str(&format!("\nSkipped groups: {}", self.skipped_groups));
        }
        text
    }
}

/// Parsed keeper selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Leave the group untouched.
    Skip,
    /// Keep the member at this 0-based index.
    Keep(usize),
    /// Not a number in range.
    Invalid,
}

/// Parse a 1-based keeper answer for a group of `len` members.
#[must_use]
pub fn parse_selection(answer: &str, len: usize) -> Selection {
    let answer = answer.trim();
    if answer.is_empty() {
        return Selection::Skip;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Selection::Keep(n - 1),
        _ => Selection::Invalid,
    }
}

const INVALID_SELECTION: &str = "Invalid input. Please enter a number from the list.";

/// Sequential deletion driven by a [`DecisionProvider`].
///
/// Every report line is echoed to `out` as it is produced.
pub struct DeletionEngine<D, W> {
    decisions: D,
    out: W,
    dry_run: bool,
}

impl<D: DecisionProvider, W: Write> DeletionEngine<D, W> {
    /// Create an engine that performs real deletions.
    pub fn new(decisions: D, out: W) -> Self {
        Self {
            decisions,
            out,
            dry_run: false,
        }
    }

    /// Simulate instead of deleting.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Give back the decision provider and the output writer.
    pub fn into_parts(self) -> (D, W) {
        (self.decisions, self.out)
    }

    /// Remove every non-keeper member of every group.
    ///
    /// Asks for one confirmation unless this is a dry run or there is
    /// nothing to remove. A declined confirmation cancels the whole run.
    pub fn run_batch(&mut self, groups: &[DuplicateGroup]) -> DeletionOutcome {
        let mut outcome = DeletionOutcome::new(DeletionMode::Batch, self.dry_run);
        let targets: usize = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        if targets == 0 {
            return outcome;
        }

        if self.dry_run {
            self.echo("\n[DRY RUN]");
        } else {
            let prompt = format!(
                "Are you sure you want to delete {} duplicate file(s) from {} group(s)? (y/[n]): ",
                targets,
                groups.len()
            );
            if !self.decisions.confirm(&prompt) {
                log::info!("Batch deletion declined");
                outcome.status = DeletionStatus::Cancelled;
                self.echo("Deletion cancelled.");
                return outcome;
            }
            self.echo("\nDeleting duplicate files...");
        }

        for group in groups {
            for path in group.redundant() {
                self.remove(path, group.size, &mut outcome);
            }
        }

        log::info!(
            "Batch deletion: {} removed, {} failed",
            outcome.removed,
            outcome.failures
        );
        outcome
    }

    /// Ask for a keeper per group and remove the other members.
    ///
    /// An empty answer or exhausted input skips the group. Answers that are
    /// not a member number are rejected and asked again.
    pub fn run_interactive(&mut self, groups: &[DuplicateGroup]) -> DeletionOutcome {
        let mut outcome = DeletionOutcome::new(DeletionMode::Interactive, self.dry_run);

        for (idx, group) in groups.iter().enumerate() {
            let number = idx + 1;
            if group.len() < 2 {
                log::debug!("Group {} has nothing to choose from", number);
                continue;
            }
            match self.ask_keeper(number, group) {
                Some(keep) => {
                    log::debug!("Group {}: keeping {}", number, group.paths[keep].display());
                    for (i, path) in group.paths.iter().enumerate() {
                        if i != keep {
                            self.remove(path, group.size, &mut outcome);
                        }
                    }
                }
                None => {
                    outcome.skipped_groups += 1;
                    self.record(ReportLine::Skipped(number), &mut outcome);
                }
            }
        }

        log::info!(
            "Interactive deletion: {} removed, {} failed, {} groups skipped",
            outcome.removed,
            outcome.failures,
            outcome.skipped_groups
        );
        outcome
    }

    fn ask_keeper(&mut self, number: usize, group: &DuplicateGroup) -> Option<usize> {
        loop {
            let answer = self.decisions.select_keeper(number, group)?;
            match parse_selection(&answer, group.len()) {
                Selection::Skip => return None,
                Selection::Keep(index) => return Some(index),
                Selection::Invalid => {
                    log::trace!("Rejected selection {:?} for group {}", answer, number);
                    self.decisions.reject(INVALID_SELECTION);
                }
            }
        }
    }

    fn remove(&mut self, path: &Path, size: u64, outcome: &mut DeletionOutcome) {
        if self.dry_run {
            outcome.removed += 1;
            outcome.bytes += size;
            self.record(ReportLine::WouldDelete(path.to_path_buf()), outcome);
            return;
        }

        match remove_file(path) {
            Ok(()) => {
                outcome.removed += 1;
                outcome.bytes += size;
                self.record(ReportLine::Deleted(path.to_path_buf()), outcome);
            }
            Err(e) => {
                log::warn!("Failed to delete {}: {}", path.display(), e);
                outcome.failures += 1;
                self.record(
                    ReportLine::Failed {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    },
                    outcome,
                );
            }
        }
    }

    fn record(&mut self, line: ReportLine, outcome: &mut DeletionOutcome) {
        self.echo(&line.to_string());
        outcome.lines.push(line);
    }

    fn echo(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            log::debug!("Could not write deletion output: {}", e);
        }
    }
}
