//! Pipeline orchestration.
//!
//! [`DuplicateFinder`] runs the detection stages in order:
//!
//! 1. **Scan** - walk the root and collect filtered candidates
//! 2. **Size** - bucket by size, drop unique sizes
//! 3. **Hash** - BLAKE3 every remaining candidate on the worker pool
//! 4. **Verify** - optional byte-for-byte split of digest buckets
//! 5. **Group** - build and order the duplicate groups
//!
//! Per-file failures in any stage are logged, counted in [`ScanSummary`] and
//! never abort the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{build_groups, group_by_size, DuplicateGroup};
use super::hashing::{hash_candidates, HashConfig};
use super::verify::verify_buckets;
use crate::config::{ConfigError, ScanConfig};
use crate::progress::ProgressCallback;
use crate::scanner::{HashError, Hasher, ScanError, Walker};

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files that passed the pattern and size filters
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files that shared their size with another file
    pub candidates: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files dropped because they could not be hashed
    pub failed_files: usize,
    /// Extra sets created by content verification
    pub verify_splits: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Files beyond the keeper across all groups
    pub duplicate_files: usize,
    /// Bytes freed by removing every non-keeper
    pub reclaimable_space: u64,
    /// Wall time of the whole pipeline
    pub scan_duration: Duration,
    /// Entries that could not be read during the walk
    pub scan_errors: Vec<ScanError>,
    /// Files that could not be hashed
    pub hash_errors: Vec<HashError>,
}

impl ScanSummary {
    /// Whether any per-file error occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.hash_errors.is_empty()
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

/// Errors that stop the pipeline before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Runs the detection pipeline for one [`ScanConfig`].
///
/// # Example
///
/// ```no_run
/// use dupsweep::config::ScanConfig;
/// use dupsweep::duplicates::DuplicateFinder;
///
/// let config = ScanConfig::new("/some/path").unwrap().with_verify_content(true);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, summary) = finder.find_duplicates().unwrap();
/// println!("{} groups, {} reclaimable", groups.len(), summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    config: ScanConfig,
    hasher: Arc<Hasher>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("config", &self.config)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a finder for the given configuration.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            hasher: Arc::new(Hasher::new()),
            progress_callback: None,
        }
    }

    /// Report progress for the scan, hash and verify stages.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run every stage and return the ordered groups with a summary.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Config`] if patterns or the size range are
    /// invalid. Nothing is read from disk in that case.
    pub fn find_duplicates(&self) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start = Instant::now();
        let walker_config = self.config.walker_config()?;
        let workers = self.config.worker_count();
        let mut summary = ScanSummary::default();

        log::info!("Scanning {}", self.config.root.display());
        let mut walker = Walker::new(&self.config.root, walker_config);
        if let Some(ref callback) = self.progress_callback {
            walker = walker.with_progress_callback(Arc::clone(callback));
        }
        let (files, scan_stats) = walker.collect();
        summary.scan_errors = scan_stats.errors;

        let (size_buckets, grouping) = group_by_size(files);
        summary.total_files = grouping.total_files;
        summary.total_size = grouping.total_size;
        summary.candidates = grouping.potential_duplicates;

        let mut hash_config = HashConfig::default().with_workers(workers);
        if let Some(ref callback) = self.progress_callback {
            hash_config = hash_config.with_progress_callback(Arc::clone(callback));
        }
        let (digest_buckets, hash_stats) =
            hash_candidates(size_buckets, Arc::clone(&self.hasher), &hash_config);
        summary.hashed_files = hash_stats.hashed_files;
        summary.failed_files = hash_stats.failed_files;
        summary.hash_errors = hash_stats.errors;

        let groups = if self.config.verify_content {
            let (sets, verify_stats) =
                verify_buckets(digest_buckets, self.progress_callback.as_ref());
            summary.verify_splits = verify_stats.buckets_split;
            build_groups(sets, self.config.sort_mode)
        } else {
            build_groups(digest_buckets.into_values(), self.config.sort_mode)
        };

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start.elapsed();

        log::info!(
            "Found {} duplicate groups ({} redundant files, {} reclaimable) in {:.2?}",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.scan_duration
        );

        Ok((groups, summary))
    }
}
