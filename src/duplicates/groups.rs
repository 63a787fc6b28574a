//! Size bucketing and duplicate group construction.
//!
//! # Overview
//!
//! Two pure stages of the pipeline live here:
//!
//! - [`group_by_size`]: files of different sizes cannot be duplicates, so
//!   only sizes shared by two or more files go on to hashing.
//! - [`build_groups`]: turns digest buckets into ordered [`DuplicateGroup`]s.
//!
//! # Example
//!
//! ```
//! use dupsweep::scanner::FileEntry;
//! use dupsweep::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/a.txt"), 100),
//!     FileEntry::new(PathBuf::from("/b.txt"), 100),
//!     FileEntry::new(PathBuf::from("/c.txt"), 200),
//! ];
//!
//! let (buckets, stats) = group_by_size(files);
//!
//! assert_eq!(buckets.len(), 1);
//! assert_eq!(buckets[&100].len(), 2);
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::SortMode;
use crate::scanner::{hash_to_hex, Digest, FileEntry};

/// A set of files with identical content.
///
/// Groups built through [`DuplicateGroup::new`] hold at least two paths in
/// lexicographic order; the first one is the keeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared content digest
    pub digest: Digest,
    /// Size of each member in bytes
    pub size: u64,
    /// Member paths, sorted
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Build a group from its members, sorting the paths.
    ///
    /// Returns `None` for fewer than two members.
    #[must_use]
    pub fn new(digest: Digest, size: u64, mut paths: Vec<PathBuf>) -> Option<Self> {
        if paths.len() < 2 {
            return None;
        }
        paths.sort();
        Some(Self {
            digest,
            size,
            paths,
        })
    }

    /// The path that is kept by batch deletion.
    #[must_use]
    pub fn keeper(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Every member except the keeper.
    #[must_use]
    pub fn redundant(&self) -> &[PathBuf] {
        self.paths.get(1..).unwrap_or(&[])
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false for groups built by [`build_groups`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of copies beyond the keeper.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes freed by removing every copy but one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.digest)
    }
}

/// Statistics from the size bucketing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files bucketed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct sizes seen
    pub unique_sizes: usize,
    /// Files in buckets of two or more
    pub potential_duplicates: usize,
    /// Files dropped because their size was unique
    pub eliminated_unique: usize,
    /// Zero-byte files seen
    pub empty_files: usize,
    /// Buckets kept
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Bucket files by exact size, dropping sizes seen only once.
///
/// Zero-byte files are bucketed like any other size, so two empty files
/// end up as duplicates of each other.
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (HashMap<u64, Vec<FileEntry>>, GroupingStats) {
    let mut all: HashMap<u64, Vec<FileEntry>> = HashMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        all.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = all.len();

    let buckets: HashMap<u64, Vec<FileEntry>> = all
        .into_iter()
        .filter(|(size, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!("Unique size {}: {}", size, files[0].path.display());
                false
            } else {
                stats.potential_duplicates += files.len();
                stats.duplicate_groups += 1;
                true
            }
        })
        .collect();

    log::info!(
        "Size bucketing: {} files -> {} candidates in {} buckets ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.duplicate_groups,
        stats.elimination_rate()
    );

    (buckets, stats)
}

/// Turn content buckets into ordered duplicate groups.
///
/// Buckets with fewer than two members are dropped. Groups are first ordered
/// by keeper path, then stably sorted according to `sort_mode`.
#[must_use]
pub fn build_groups(
    buckets: impl IntoIterator<Item = Vec<FileEntry>>,
    sort_mode: SortMode,
) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter_map(|members| {
            let first = members.first()?;
            let digest = first.digest.unwrap_or_default();
            let size = first.size;
            debug_assert!(members.iter().all(|f| f.size == size));
            let paths = members.into_iter().map(|f| f.path).collect();
            DuplicateGroup::new(digest, size, paths)
        })
        .collect();

    groups.sort_by(|a, b| a.keeper().cmp(&b.keeper()));
    sort_groups(&mut groups, sort_mode);
    groups
}

/// Apply a sort mode in place. Ties keep their current relative order.
pub fn sort_groups(groups: &mut [DuplicateGroup], sort_mode: SortMode) {
    match sort_mode {
        SortMode::None => {}
        SortMode::ByCount => groups.sort_by(|a, b| b.len().cmp(&a.len())),
        SortMode::BySize => groups.sort_by(|a, b| b.size.cmp(&a.size)),
    }
}
