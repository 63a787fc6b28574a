//! Byte-for-byte verification of digest matches.
//!
//! A digest bucket is split into sets of files whose bytes are identical:
//! take the first remaining file as reference, compare it with every other
//! remaining file, move the matches into the reference's set and repeat on
//! what is left. This is quadratic in the bucket size.
//!
//! A comparison that fails with an I/O error counts as a mismatch.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{Digest, FileEntry, HashError, BLOCK_SIZE};

/// Statistics from the verification stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyStats {
    /// Digest buckets examined (two or more members)
    pub buckets_checked: usize,
    /// Extra sets created because a bucket held differing content
    pub buckets_split: usize,
    /// Pairwise comparisons performed
    pub comparisons: usize,
    /// Comparisons that failed with an I/O error
    pub comparison_errors: usize,
}

/// Compare two files chunk by chunk.
///
/// Sizes are checked first; the content loop stops at the first differing
/// chunk.
///
/// # Errors
///
/// Returns [`HashError`] if either file cannot be opened or read.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, HashError> {
    let size_a = std::fs::metadata(a).map_err(|e| HashError::from_io(a, e))?.len();
    let size_b = std::fs::metadata(b).map_err(|e| HashError::from_io(b, e))?.len();
    if size_a != size_b {
        return Ok(false);
    }

    let mut file_a = File::open(a).map_err(|e| HashError::from_io(a, e))?;
    let mut file_b = File::open(b).map_err(|e| HashError::from_io(b, e))?;
    let mut buf_a = vec![0u8; BLOCK_SIZE];
    let mut buf_b = vec![0u8; BLOCK_SIZE];

    loop {
        let n_a = fill_chunk(&mut file_a, &mut buf_a).map_err(|e| HashError::from_io(a, e))?;
        let n_b = fill_chunk(&mut file_b, &mut buf_b).map_err(|e| HashError::from_io(b, e))?;
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Split one digest bucket into sets of byte-identical files.
///
/// Every input file appears in exactly one output set. Singleton sets are
/// returned too.
#[must_use]
pub fn verify_bucket(files: Vec<FileEntry>, stats: &mut VerifyStats) -> Vec<Vec<FileEntry>> {
    let mut sets = Vec::new();
    let mut remaining = files;

    while !remaining.is_empty() {
        let reference = remaining.remove(0);
        let mut same = vec![];
        let mut rest = Vec::with_capacity(remaining.len());

        for candidate in remaining {
            stats.comparisons += 1;
            match files_identical(&reference.path, &candidate.path) {
                Ok(true) => same.push(candidate),
                Ok(false) => rest.push(candidate),
                Err(e) => {
                    log::warn!(
                        "Could not compare {} with {}: {}",
                        reference.path.display(),
                        candidate.path.display(),
                        e
                    );
                    stats.comparison_errors += 1;
                    rest.push(candidate);
                }
            }
        }

        let mut set = Vec::with_capacity(same.len() + 1);
        set.push(reference);
        set.extend(same);
        sets.push(set);
        remaining = rest;
    }

    sets
}

/// Verify every multi-member digest bucket.
///
/// Single-member buckets pass through untouched.
#[must_use]
pub fn verify_buckets(
    buckets: HashMap<Digest, Vec<FileEntry>>,
    progress: Option<&Arc<dyn ProgressCallback>>,
) -> (Vec<Vec<FileEntry>>, VerifyStats) {
    let mut stats = VerifyStats::default();
    let to_check = buckets.values().filter(|b| b.len() > 1).count();

    log::info!("Verifying content of {} digest groups", to_check);
    if let Some(callback) = progress {
        callback.on_phase_start("verify", to_check);
    }

    let mut out = Vec::with_capacity(buckets.len());
    for files in buckets.into_values() {
        if files.len() < 2 {
            out.push(files);
            continue;
        }

        stats.buckets_checked += 1;
        if let Some(callback) = progress {
            callback.on_progress(stats.buckets_checked, files[0].path.to_string_lossy().as_ref());
        }

        let sets = verify_bucket(files, &mut stats);
        if sets.len() > 1 {
            log::warn!(
                "Digest match with differing content: bucket split into {} sets",
                sets.len()
            );
            stats.buckets_split += sets.len() - 1;
        }
        out.extend(sets);
    }

    if let Some(callback) = progress {
        callback.on_phase_end("verify");
    }
    log::info!(
        "Verification complete: {} comparisons, {} splits, {} errors",
        stats.comparisons,
        stats.buckets_split,
        stats.comparison_errors
    );

    (out, stats)
}
