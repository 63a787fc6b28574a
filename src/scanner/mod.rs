//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential, sorted directory walking using walkdir
//! - Include/exclude glob filtering on POSIX-normalized paths
//! - Streaming BLAKE3 content digests
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`filter`]: Include/exclude glob matching
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{PathFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: Some(1024),
//!     filter: PathFilter::new(&[], &["*.log".to_string()]).unwrap(),
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! let (files, stats) = walker.collect();
//! println!("{} candidates, {} errors", files.len(), stats.errors.len());
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use filter::PathFilter;
pub use hasher::{hash_to_hex, Digest, Hasher, BLOCK_SIZE};
pub use walker::{ScanStats, Walker};

/// One scanned file.
///
/// Created by the [`Walker`]; the digest is attached once by the hashing
/// stage and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Content digest, present after hashing
    pub digest: Option<Digest>,
}

impl FileEntry {
    /// Create a new FileEntry without a digest.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            digest: None,
        }
    }

    /// Consume the entry and return it with its digest attached.
    #[must_use]
    pub fn with_digest(self, digest: Digest) -> Self {
        debug_assert!(self.digest.is_none(), "digest attached twice");
        Self {
            digest: Some(digest),
            ..self
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Minimum file size to include (in bytes, inclusive).
    pub min_size: Option<u64>,

    /// Maximum file size to include (in bytes, inclusive).
    pub max_size: Option<u64>,

    /// Compiled include/exclude patterns.
    pub filter: PathFilter,
}

impl WalkerConfig {
    /// Create a new walker configuration.
    #[must_use]
    pub fn new(min_size: Option<u64>, max_size: Option<u64>, filter: PathFilter) -> Self {
        Self {
            min_size,
            max_size,
            filter,
        }
    }
}

/// Errors that can occur during directory scanning.
///
/// None of these abort a scan; they are logged and collected.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry vanished between listing and stat.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The directory iterator reported an error.
    #[error("Walk error for {path}: {message}")]
    Walk {
        /// Path where the error occurred
        path: PathBuf,
        /// Description from walkdir
        message: String,
    },
}

impl ScanError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing or comparison.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hashing task died before reporting a result.
    #[error("Hashing task failed for {0}")]
    TaskFailed(PathBuf),
}

impl HashError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
