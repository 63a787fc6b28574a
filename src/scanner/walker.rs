//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting candidate [`FileEntry`] records.
//!
//! # Features
//!
//! - Sorted, single-threaded traversal (stable order for an unchanged tree)
//! - Symlinks are never followed and never become candidates
//! - Include/exclude glob filtering via [`PathFilter`](super::PathFilter)
//! - Size filtering (min/max, inclusive)
//! - Unreadable entries are logged and skipped, never fatal
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Directory walker for candidate discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

/// Counters collected while walking.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Regular files seen (before filtering)
    pub files_seen: usize,
    /// Files removed by include/exclude patterns
    pub filtered_by_pattern: usize,
    /// Files removed by size bounds
    pub filtered_by_size: usize,
    /// Symlinks skipped
    pub symlinks_skipped: usize,
    /// Entries that could not be read
    pub errors: Vec<ScanError>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// The caller is expected to have validated `path` as an existing
    /// directory already; see [`ScanConfig`](crate::config::ScanConfig).
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if let Some(min) = self.config.min_size {
            if size < min {
                return false;
            }
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding candidate entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Entries are visited in file-name order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        self.walk_inner(None)
    }

    /// Walk the tree and split the results into candidates and statistics.
    #[must_use]
    pub fn collect(&self) -> (Vec<FileEntry>, ScanStats) {
        let mut stats = ScanStats::default();
        let mut files = Vec::new();

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("scan", 0);
        }

        let mut errors = Vec::new();
        for result in self.walk_inner(Some(&mut stats)) {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) => errors.push(e),
            }
        }
        stats.errors = errors;

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("scan");
        }

        log::info!(
            "Scan complete: {} candidates from {} files ({} filtered by pattern, {} by size, {} unreadable)",
            files.len(),
            stats.files_seen,
            stats.filtered_by_pattern,
            stats.filtered_by_size,
            stats.errors.len()
        );

        (files, stats)
    }

    fn walk_inner<'a>(
        &'a self,
        mut stats: Option<&'a mut ScanStats>,
    ) -> impl Iterator<Item = Result<FileEntry, ScanError>> + 'a {
        let walk_dir = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name();

        walk_dir.into_iter().filter_map(move |entry_result| {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    if self.config.filter.excludes_tree(&path) {
                        log::debug!("Ignoring unreadable excluded path {}: {}", path.display(), e);
                        return None;
                    }
                    return Some(Err(handle_walk_error(path, e)));
                }
            };

            let file_type = entry.file_type();

            // Skip directories (we only want files)
            if file_type.is_dir() {
                return None;
            }

            // Never follow or hash symlinks, whatever they point at
            if file_type.is_symlink() {
                log::trace!("Skipping symlink: {}", entry.path().display());
                if let Some(stats) = stats.as_deref_mut() {
                    stats.symlinks_skipped += 1;
                }
                return None;
            }

            // Sockets, fifos and devices are not candidates
            if !file_type.is_file() {
                return None;
            }

            let path = entry.into_path();
            if let Some(stats) = stats.as_deref_mut() {
                stats.files_seen += 1;
            }

            // Patterns need only the path, so filtered files are never stat'ed
            if !self.config.filter.allows(&path) {
                log::trace!("Skipping file due to pattern filter: {}", path.display());
                if let Some(stats) = stats.as_deref_mut() {
                    stats.filtered_by_pattern += 1;
                }
                return None;
            }

            let metadata = match std::fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => return Some(Err(handle_io_error(&path, e))),
            };
            if !metadata.is_file() {
                return None;
            }

            self.process_file_entry(path, &metadata, stats.as_deref_mut())
        })
    }

    /// Apply the size bounds to a regular file and build its entry.
    fn process_file_entry(
        &self,
        path: PathBuf,
        metadata: &Metadata,
        stats: Option<&mut ScanStats>,
    ) -> Option<Result<FileEntry, ScanError>> {
        let mut stats = stats;
        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::trace!(
                "Skipping file due to size filter ({}): {}",
                size,
                path.display()
            );
            if let Some(stats) = stats.as_deref_mut() {
                stats.filtered_by_size += 1;
            }
            return None;
        }

        Some(Ok(FileEntry::new(path, size)))
    }
}

/// Handle I/O errors during file access.
fn handle_io_error(path: &Path, error: std::io::Error) -> ScanError {
    match error.kind() {
        std::io::ErrorKind::NotFound => {
            log::debug!("File not found (may have been deleted): {}", path.display());
        }
        _ => log::warn!("Unable to access {}: {}", path.display(), error),
    }
    ScanError::from_io(path.to_path_buf(), error)
}

/// Handle walkdir errors (unreadable directories, loops).
fn handle_walk_error(path: PathBuf, error: walkdir::Error) -> ScanError {
    log::warn!("Walker error for {}: {}", path.display(), error);
    let message = error.to_string();
    match error.into_io_error() {
        Some(io_error) => ScanError::from_io(path, io_error),
        None => ScanError::Walk { path, message },
    }
}
