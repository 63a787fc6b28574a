//! Command-line interface definitions for dupsweep.
//!
//! A single command with flags, parsed with the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # List duplicates
//! dupsweep ~/Downloads
//!
//! # Skip logs and tiny files, verify matches byte by byte
//! dupsweep ~/Downloads --exclude '*.log' --min-size 4KiB --verify-content
//!
//! # See what batch deletion would remove
//! dupsweep ~/Downloads --delete --dry-run --delete-report removed.txt
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Find and safely remove duplicate files.
///
/// Files are bucketed by size, hashed with BLAKE3 in parallel and optionally
/// compared byte by byte. Within each group the lexicographically first path
/// is the keeper.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Include only paths matching this glob (repeatable)
    ///
    /// Unix glob syntax matched against the full POSIX-style path:
    /// `*.jpg`, `photos/*`, `**/src/**`.
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Exclude paths matching this glob (repeatable)
    ///
    /// Applied after --include. Example: `*.log`, `**/.git/**`.
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Minimum file size to consider (e.g., 100K, 5MB, 1.5GiB)
    ///
    /// Supports suffixes: B, K/KB, Ki/KiB, M/MB, Mi/MiB, G/GB, Gi/GiB, T/TB, Ti/TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Maximum file size to consider (e.g., 100K, 5MB, 1.5GiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Number of hashing threads (default: CPU count, at most 32)
    ///
    /// Zero or a negative number selects the default.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Compare files byte by byte after a digest match
    #[arg(long)]
    pub verify_content: bool,

    /// Sort groups by number of files (descending)
    #[arg(long, conflicts_with = "sort_by_file_size")]
    pub sort_by_group_size: bool,

    /// Sort groups by file size (descending)
    #[arg(long)]
    pub sort_by_file_size: bool,

    /// Write the duplicate report to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Delete every duplicate except the first file of each group
    #[arg(long)]
    pub delete: bool,

    /// Choose the file to keep group by group
    #[arg(long, conflicts_with = "delete")]
    pub interactive: bool,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write the deletion report to this file
    #[arg(long, value_name = "FILE")]
    pub delete_report: Option<PathBuf>,

    /// Answer yes to the deletion confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Settings file (TOML) to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Decimal suffixes (`K`, `KB`, `M`, `MB`, ...) use powers of 1000, binary
/// suffixes (`Ki`, `KiB`, `Mi`, `MiB`, ...) powers of 1024. Matching is
/// case-insensitive, whitespace around the number and suffix is ignored and
/// fractions are truncated to whole bytes.
///
/// ```
/// use dupsweep::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("100K").unwrap(), 100_000);
/// assert_eq!(parse_size("1Ki").unwrap(), 1024);
/// assert_eq!(parse_size("1.5 MiB").unwrap(), 1_572_864);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (s[..idx].trim(), s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;
    if !num.is_finite() {
        return Err(format!("Invalid number: '{num_str}'"));
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1_000,
        "KI" | "KIB" => 1 << 10,
        "M" | "MB" => 1_000_000,
        "MI" | "MIB" => 1 << 20,
        "G" | "GB" => 1_000_000_000,
        "GI" | "GIB" => 1 << 30,
        "T" | "TB" => 1_000_000_000_000,
        "TI" | "TIB" => 1 << 40,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    let bytes = num * multiplier as f64;
    if bytes > u64::MAX as f64 {
        return Err(format!("Size too large: '{s}'"));
    }
    Ok(bytes as u64)
}
