//! Include/exclude glob filtering.
//!
//! Patterns use Unix glob syntax (`*`, `?`, `**`, `[...]`) and are matched
//! against the whole POSIX-normalized path. As with `fnmatch`, a single `*`
//! may cross `/`, so `*.log` matches `/var/tmp/app/debug.log`.
//!
//! Evaluation order: the include set first (an empty include set lets
//! everything through), then the exclude set (any match removes the path).

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::ConfigError;

/// Compiled include and exclude pattern sets.
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self {
            include: GlobSet::empty(),
            exclude: GlobSet::empty(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl PathFilter {
    /// Compile include and exclude patterns.
    ///
    /// Patterns are trimmed and blank patterns dropped before compiling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that is
    /// not valid glob syntax.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        let include_patterns = normalize_patterns(include);
        let exclude_patterns = normalize_patterns(exclude);

        Ok(Self {
            include: build_set(&include_patterns)?,
            exclude: build_set(&exclude_patterns)?,
            include_patterns,
            exclude_patterns,
        })
    }

    /// Whether no patterns were configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include_patterns.is_empty() && self.exclude_patterns.is_empty()
    }

    /// Normalized include patterns.
    #[must_use]
    pub fn include_patterns(&self) -> &[String] {
        &self.include_patterns
    }

    /// Normalized exclude patterns.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Check a path against the include set, then the exclude set.
    #[must_use]
    pub fn allows(&self, path: &Path) -> bool {
        let normalized = to_posix(path);

        if !self.include_patterns.is_empty() && !self.include.is_match(&normalized) {
            return false;
        }

        !self.exclude.is_match(&normalized)
    }

    /// Whether the exclude set covers `dir` itself or anything below it.
    ///
    /// The include set is not consulted: a directory name rarely matches a
    /// file pattern even when its contents would.
    #[must_use]
    pub fn excludes_tree(&self, dir: &Path) -> bool {
        if self.exclude_patterns.is_empty() {
            return false;
        }
        let normalized = to_posix(dir);
        let normalized = normalized.trim_end_matches('/');
        self.exclude.is_match(normalized) || self.exclude.is_match(format!("{normalized}/"))
    }
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn to_posix(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    if cfg!(windows) {
        path_str.replace('\\', "/")
    } else {
        path_str.into_owned()
    }
}

fn normalize_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn build_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.kind().to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}
