//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of file contents. Files are read in fixed [`BLOCK_SIZE`] blocks so memory
//! use stays flat regardless of file size.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// BLAKE3 digest (32 bytes).
pub type Digest = [u8; 32];

/// Block size for streaming reads (64 KiB).
pub const BLOCK_SIZE: usize = 64 * 1024;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    block_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher that reads in [`BLOCK_SIZE`] blocks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }

    /// Override the read block size (minimum 1 byte).
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    /// Compute the digest of a file's full content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Compute the digest of everything a reader yields.
    ///
    /// # Errors
    ///
    /// Propagates read errors; `Interrupted` reads are retried.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}

/// Render a digest as lowercase hex.
#[must_use]
pub fn hash_to_hex(digest: &Digest) -> String {
    blake3::Hash::from(*digest).to_hex().to_string()
}
