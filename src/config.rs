//! Run configuration and layered settings.
//!
//! # Overview
//!
//! Two types live here:
//!
//! - [`Settings`]: optional defaults loaded with `figment` from, in rising
//!   priority, built-in defaults, a TOML settings file and `DUPSWEEP_*`
//!   environment variables.
//! - [`ScanConfig`]: the validated, immutable description of one run. It is
//!   produced from [`Settings`] plus command-line flags by
//!   [`ScanConfig::from_sources`], or built directly in code.
//!
//! Every check that can fail happens while building a [`ScanConfig`], so a
//! bad root, size string, size range or glob pattern is reported before any
//! file is touched.
//!
//! # Settings file
//!
//! ```toml
//! exclude = ["**/.git/**", "*.tmp"]
//! min_size = "4KiB"
//! threads = 8
//! verify_content = true
//! sort = "size"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{parse_size, Cli};
use crate::scanner::{PathFilter, WalkerConfig};

/// Prefix for settings read from the environment.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Worker counts above this are honored but logged as a warning.
pub const MAX_RECOMMENDED_WORKERS: usize = 32;

/// Configuration problems detected before scanning starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The root directory does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A size string could not be parsed.
    #[error("Invalid size '{0}'")]
    InvalidSize(String),

    /// The minimum size is larger than the maximum size.
    #[error("Minimum size {min} is larger than maximum size {max}")]
    InvalidSizeRange {
        /// Lower bound in bytes
        min: u64,
        /// Upper bound in bytes
        max: u64,
    },

    /// Both sort modes were requested.
    #[error("Sorting by group size and by file size are mutually exclusive")]
    ConflictingSort,

    /// A glob pattern has invalid syntax.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        message: String,
    },

    /// The settings file or environment could not be loaded.
    #[error("Failed to load settings: {0}")]
    Settings(String),
}

/// Ordering applied to the final group list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Keep the base order (by keeper path).
    #[default]
    #[serde(rename = "none")]
    None,
    /// Descending number of members.
    #[serde(rename = "count")]
    ByCount,
    /// Descending per-file size.
    #[serde(rename = "size")]
    BySize,
}

impl SortMode {
    /// Resolve the two command-line sort flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingSort`] when both flags are set.
    pub fn from_flags(by_group_size: bool, by_file_size: bool) -> Result<Self, ConfigError> {
        match (by_group_size, by_file_size) {
            (true, true) => Err(ConfigError::ConflictingSort),
            (true, false) => Ok(Self::ByCount),
            (false, true) => Ok(Self::BySize),
            (false, false) => Ok(Self::None),
        }
    }
}

/// A size written either as a plain byte count or a human-readable string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSetting {
    /// Plain number of bytes (`min_size = 1024`)
    Bytes(u64),
    /// Human-readable size (`min_size = "1.5MiB"`)
    Text(String),
}

impl SizeSetting {
    /// Convert to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSize`] for malformed text.
    pub fn to_bytes(&self) -> Result<u64, ConfigError> {
        match self {
            Self::Bytes(bytes) => Ok(*bytes),
            Self::Text(text) => parse_size(text).map_err(|_| ConfigError::InvalidSize(text.clone())),
        }
    }
}

/// Optional defaults loaded from a settings file and the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Include globs.
    pub include: Vec<String>,
    /// Exclude globs.
    pub exclude: Vec<String>,
    /// Minimum candidate size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<SizeSetting>,
    /// Maximum candidate size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<SizeSetting>,
    /// Hashing worker count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<i64>,
    /// Byte-for-byte verification of digest matches.
    pub verify_content: bool,
    /// Group ordering.
    pub sort: SortMode,
}

impl Settings {
    /// Load settings for a run.
    ///
    /// With `explicit` set, that file must exist. Otherwise the platform
    /// default (see [`default_settings_path`]) is used when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if an explicit file is missing or a
    /// file or environment value cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::Settings(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_settings_path().filter(|p| p.is_file()),
        };

        if let Some(ref path) = file {
            log::debug!("Loading settings from {}", path.display());
        }

        Self::from_figment(Self::figment(file.as_deref()))
    }

    /// The provider stack: defaults, then the file, then the environment.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract settings from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] on type or syntax errors.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Settings(e.to_string()))
    }
}

/// Platform settings file, e.g. `~/.config/dupsweep/config.toml` on Linux.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "dupsweep", "dupsweep").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default worker count: the available parallelism, capped at 32.
#[must_use]
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
        .min(MAX_RECOMMENDED_WORKERS)
}

/// Resolve a requested worker count. Zero, negative or absent means the
/// default.
#[must_use]
pub fn resolve_workers(requested: Option<i64>) -> usize {
    match requested.filter(|&n| n > 0) {
        None => {
            if let Some(n) = requested {
                log::debug!("Worker count {} is not positive; using the default", n);
            }
            default_worker_count()
        }
        Some(n) => {
            let n = usize::try_from(n).unwrap_or(usize::MAX);
            if n > MAX_RECOMMENDED_WORKERS {
                log::warn!(
                    "{} workers requested; more than {} rarely helps I/O-bound hashing",
                    n,
                    MAX_RECOMMENDED_WORKERS
                );
            }
            n
        }
    }
}

/// Validated configuration of one run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Canonical root directory.
    pub root: PathBuf,
    /// Include globs (empty means all files).
    pub include: Vec<String>,
    /// Exclude globs.
    pub exclude: Vec<String>,
    /// Inclusive lower size bound.
    pub min_size: Option<u64>,
    /// Inclusive upper size bound.
    pub max_size: Option<u64>,
    /// Requested worker count; `None` or non-positive means the default.
    pub workers: Option<i64>,
    /// Byte-for-byte verification of digest matches.
    pub verify_content: bool,
    /// Group ordering.
    pub sort_mode: SortMode,
}

impl ScanConfig {
    /// Create a configuration for `root` with everything else defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PathNotFound`] or [`ConfigError::NotADirectory`].
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            root: canonical_root(root.as_ref())?,
            include: Vec::new(),
            exclude: Vec::new(),
            min_size: None,
            max_size: None,
            workers: None,
            verify_content: false,
            sort_mode: SortMode::None,
        })
    }

    /// Set include patterns.
    #[must_use]
    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include = patterns;
        self
    }

    /// Set exclude patterns.
    #[must_use]
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Set the inclusive size bounds.
    #[must_use]
    pub fn with_size_range(mut self, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(i64::try_from(workers).unwrap_or(i64::MAX));
        self
    }

    /// Enable or disable content verification.
    #[must_use]
    pub fn with_verify_content(mut self, verify: bool) -> Self {
        self.verify_content = verify;
        self
    }

    /// Set the group ordering.
    #[must_use]
    pub fn with_sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    /// Merge settings and command-line flags into a validated configuration.
    ///
    /// Non-empty CLI pattern lists replace the settings lists, CLI sizes and
    /// thread counts override, booleans are OR-ed and a CLI sort flag wins
    /// over the settings sort.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn from_sources(cli: &Cli, settings: Settings) -> Result<Self, ConfigError> {
        let cli_sort = SortMode::from_flags(cli.sort_by_group_size, cli.sort_by_file_size)?;
        let sort_mode = if cli_sort == SortMode::None {
            settings.sort
        } else {
            cli_sort
        };

        let min_size = match cli.min_size {
            Some(bytes) => Some(bytes),
            None => settings.min_size.as_ref().map(SizeSetting::to_bytes).transpose()?,
        };
        let max_size = match cli.max_size {
            Some(bytes) => Some(bytes),
            None => settings.max_size.as_ref().map(SizeSetting::to_bytes).transpose()?,
        };

        let config = Self {
            root: canonical_root(&cli.path)?,
            include: prefer_cli(&cli.include, settings.include),
            exclude: prefer_cli(&cli.exclude, settings.exclude),
            min_size,
            max_size,
            workers: cli.threads.or(settings.threads),
            verify_content: cli.verify_content || settings.verify_content,
            sort_mode,
        };

        config.walker_config()?;
        Ok(config)
    }

    /// Effective number of hashing workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        resolve_workers(self.workers)
    }

    /// Compile patterns and check the size range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSizeRange`] or
    /// [`ConfigError::InvalidPattern`].
    pub fn walker_config(&self) -> Result<WalkerConfig, ConfigError> {
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(ConfigError::InvalidSizeRange { min, max });
            }
        }
        let filter = PathFilter::new(&self.include, &self.exclude)?;
        Ok(WalkerConfig::new(self.min_size, self.max_size, filter))
    }
}

fn prefer_cli(cli: &[String], settings: Vec<String>) -> Vec<String> {
    if cli.is_empty() {
        settings
    } else {
        cli.to_vec()
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, ConfigError> {
    if !root.exists() {
        return Err(ConfigError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConfigError::NotADirectory(root.to_path_buf()));
    }
    root.canonicalize()
        .map_err(|_| ConfigError::PathNotFound(root.to_path_buf()))
}
