//! Human-oriented console output.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Print the group listing with human-readable sizes.
///
/// # Errors
///
/// Propagates write errors.
pub fn print_groups<W: Write>(mut out: W, groups: &[DuplicateGroup]) -> io::Result<()> {
    if groups.is_empty() {
        writeln!(out, "No duplicates found.")?;
        return Ok(());
    }

    writeln!(out, "\nDuplicate files:")?;
    for (idx, group) in groups.iter().enumerate() {
        writeln!(
            out,
            "\nGroup {} ({} file(s), size: {}):",
            idx + 1,
            group.len(),
            ByteSize::b(group.size)
        )?;
        for path in &group.paths {
            writeln!(out, "  - {}", path.display())?;
        }
    }
    Ok(())
}

/// Print the closing scan totals.
///
/// # Errors
///
/// Propagates write errors.
pub fn print_summary<W: Write>(mut out: W, summary: &ScanSummary) -> io::Result<()> {
    writeln!(
        out,
        "\nScanned {} file(s) ({}) in {:.2?}",
        summary.total_files,
        ByteSize::b(summary.total_size),
        summary.scan_duration
    )?;
    writeln!(
        out,
        "Groups found: {}, redundant files: {}, reclaimable: {}",
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.reclaimable_display()
    )?;
    let problems = summary.scan_errors.len() + summary.hash_errors.len();
    if problems > 0 {
        writeln!(out, "Skipped {problems} unreadable file(s); run with -v for details")?;
    }
    Ok(())
}
