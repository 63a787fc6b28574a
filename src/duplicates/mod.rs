//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based candidate bucketing
//! - Parallel full-content hashing
//! - Optional byte-for-byte verification
//! - Duplicate group construction and ordering

pub mod finder;
pub mod groups;
pub mod hashing;
pub mod verify;

pub use finder::{DuplicateFinder, FinderError, ScanSummary};
pub use groups::{build_groups, group_by_size, sort_groups, DuplicateGroup, GroupingStats};
pub use hashing::{hash_candidates, HashConfig, HashStats};
pub use verify::{files_identical, verify_bucket, verify_buckets, VerifyStats};
