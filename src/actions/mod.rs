//! File actions module.
//!
//! This module provides functionality for:
//! - Batch deletion keeping the first file of each group
//! - Interactive deletion with a per-group keeper choice
//! - Dry runs that report without touching the filesystem
//!
//! Decisions (the batch confirmation, keeper choices) come from a
//! [`DecisionProvider`], so the engine runs the same way against a terminal
//! or a scripted answer list.
//!
//! ```no_run
//! use dupsweep::actions::{ConsoleDecisions, DeletionEngine};
//! use dupsweep::duplicates::DuplicateGroup;
//!
//! let groups: Vec<DuplicateGroup> = Vec::new();
//! let mut engine = DeletionEngine::new(ConsoleDecisions::stdio(false), std::io::stdout());
//! let outcome = engine.run_interactive(&groups);
//! println!("{}", outcome.summary());
//! ```

pub mod decision;
pub mod delete;

// Re-export commonly used types
pub use decision::{is_affirmative, ConsoleDecisions, DecisionProvider, ScriptedDecisions};
pub use delete::{
    parse_selection, remove_file, DeleteError, DeletionEngine, DeletionMode, DeletionOutcome,
    DeletionStatus, ReportLine, Selection,
};
