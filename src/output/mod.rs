//! Output formatters for scan and deletion results.
//!
//! This module provides:
//! - Plain-text report files for duplicate groups and deletion runs
//! - Console listing and totals with human-readable sizes
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::config::ScanConfig;
//! use dupsweep::duplicates::DuplicateFinder;
//! use dupsweep::output::DuplicateReport;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(ScanConfig::new(".").unwrap());
//! let (groups, _summary) = finder.find_duplicates().unwrap();
//!
//! DuplicateReport::new(&groups).save(Path::new("duplicates.txt")).unwrap();
//! ```

pub mod console;
pub mod text;

// Re-export main types
pub use console::{print_groups, print_summary};
pub use text::{DeletionReport, DuplicateReport};
