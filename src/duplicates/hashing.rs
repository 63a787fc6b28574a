//! Parallel content hashing of size-bucket candidates.
//!
//! # Overview
//!
//! Every candidate is hashed by one task on a dedicated `rayon` pool of
//! `workers` threads. Tasks never share state: each one sends its
//! `(FileEntry, Result<Digest, HashError>)` over a `crossbeam-channel`, and
//! the calling thread is the only reader and the only writer of the
//! digest map.
//!
//! The channel disconnects once every task has dropped its sender, which is
//! the completion barrier for the stage. A task that panics drops its sender
//! while unwinding; its file is then missing from the results and is
//! recorded as [`HashError::TaskFailed`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{Digest, FileEntry, HashError, Hasher};

/// Settings for the hashing stage.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of pool threads (at least 1)
    pub workers: usize,
    /// Optional progress callback, invoked from the consumer thread
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("workers", &self.workers)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            workers: crate::config::default_worker_count(),
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the number of worker threads.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the hashing stage.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Files submitted for hashing
    pub input_files: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files dropped because hashing failed
    pub failed_files: usize,
    /// Bytes read across all successful hashes
    pub bytes_hashed: u64,
    /// Per-file failures
    pub errors: Vec<HashError>,
}

/// Hash every candidate and bucket the results by digest.
///
/// Returns once every submitted file has either produced a digest or been
/// recorded as a failure. Buckets with a single member are kept; dropping
/// them is the grouper's job.
#[must_use]
pub fn hash_candidates(
    size_buckets: HashMap<u64, Vec<FileEntry>>,
    hasher: Arc<Hasher>,
    config: &HashConfig,
) -> (HashMap<Digest, Vec<FileEntry>>, HashStats) {
    hash_candidates_with(size_buckets, config, move |path| hasher.full_hash(path))
}

/// [`hash_candidates`] with a caller-supplied digest function.
#[must_use]
pub fn hash_candidates_with<F>(
    size_buckets: HashMap<u64, Vec<FileEntry>>,
    config: &HashConfig,
    hash_fn: F,
) -> (HashMap<Digest, Vec<FileEntry>>, HashStats)
where
    F: Fn(&Path) -> Result<Digest, HashError> + Send + Sync + 'static,
{
    let files: Vec<FileEntry> = size_buckets.into_values().flatten().collect();
    let mut stats = HashStats {
        input_files: files.len(),
        ..Default::default()
    };
    let mut by_digest: HashMap<Digest, Vec<FileEntry>> = HashMap::new();

    if files.is_empty() {
        log::debug!("Hashing: no candidates");
        return (by_digest, stats);
    }

    let workers = config.workers.max(1);
    log::info!("Hashing {} files with {} workers", files.len(), workers);

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hash", files.len());
    }

    let mut pending: HashMap<usize, PathBuf> = files
        .iter()
        .enumerate()
        .map(|(idx, f)| (idx, f.path.clone()))
        .collect();

    let results = submit(files, workers, Arc::new(hash_fn));

    let mut completed = 0usize;
    for (idx, file, result) in results {
        pending.remove(&idx);
        completed += 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_progress(completed, file.path.to_string_lossy().as_ref());
        }

        match result {
            Ok(digest) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                by_digest.entry(digest).or_default().push(file.with_digest(digest));
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    let mut lost: Vec<PathBuf> = pending.into_values().collect();
    lost.sort();
    for path in lost {
        log::warn!("No result for {}; hashing task failed", path.display());
        stats.failed_files += 1;
        stats.errors.push(HashError::TaskFailed(path));
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hash");
    }

    log::info!(
        "Hashing complete: {} hashed, {} failed, {} distinct digests",
        stats.hashed_files,
        stats.failed_files,
        by_digest.len()
    );

    (by_digest, stats)
}

type HashResult = (usize, FileEntry, Result<Digest, HashError>);

/// Spawn one task per file and hand back the receiving end of the channel.
fn submit<F>(
    files: Vec<FileEntry>,
    workers: usize,
    hash_fn: Arc<F>,
) -> crossbeam_channel::IntoIter<HashResult>
where
    F: Fn(&Path) -> Result<Digest, HashError> + Send + Sync + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded::<HashResult>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("dupsweep-hash-{i}"))
        .panic_handler(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!("Hashing task panicked: {}", message);
        })
        .build();

    match pool {
        Ok(pool) => {
            for (idx, file) in files.into_iter().enumerate() {
                let tx = tx.clone();
                let hash_fn = Arc::clone(&hash_fn);
                pool.spawn(move || {
                    let result = (*hash_fn)(&file.path);
                    // The receiver outlives every task.
                    let _ = tx.send((idx, file, result));
                });
            }
        }
        Err(e) => {
            log::warn!("Failed to build hashing pool ({}); hashing on the calling thread", e);
            for (idx, file) in files.into_iter().enumerate() {
                let result = (*hash_fn)(&file.path);
                let _ = tx.send((idx, file, result));
            }
        }
    }

    drop(tx);
    rx.into_iter()
}
