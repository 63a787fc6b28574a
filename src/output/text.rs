//! Plain-text report files.
//!
//! Two formats:
//!
//! - [`DuplicateReport`]: the groups found
//!
//!   ```text
//!   Duplicate files:
//!
//!   Group 1 (3 file(s), size: 1024 bytes):
//!     - /data/a.bin
//!     - /data/b.bin
//!     - /data/c.bin
//!   ```
//!
//! - [`DeletionReport`]: a titled log of what the deletion engine did
//!
//!   ```text
//!   Duplicate File Deletion Report
//!   ====================================
//!   Deleted: /data/b.bin
//!   FAILED: /data/c.bin (permission denied)
//!   ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::actions::DeletionOutcome;
use crate::duplicates::DuplicateGroup;

/// Duplicate group report.
pub struct DuplicateReport<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> DuplicateReport<'a> {
    /// Create a report over the given groups.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "Duplicate files:")?;
        for (idx, group) in self.groups.iter().enumerate() {
            writeln!(
                writer,
                "\nGroup {} ({} file(s), size: {} bytes):",
                idx + 1,
                group.len(),
                group.size
            )?;
            for path in &group.paths {
                writeln!(writer, "  - {}", path.display())?;
            }
        }
        writer.flush()
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the report to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns the error from creating or writing the file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        self.write_to(BufWriter::new(File::create(path)?))
    }
}

/// Deletion log report.
pub struct DeletionReport<'a> {
    outcome: &'a DeletionOutcome,
}

impl<'a> DeletionReport<'a> {
    /// Create a report for a finished deletion run.
    #[must_use]
    pub fn new(outcome: &'a DeletionOutcome) -> Self {
        Self { outcome }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.outcome.mode.report_title())?;
        writeln!(writer, "{}", "=".repeat(self.outcome.mode.report_rule_width()))?;
        for line in &self.outcome.lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the report to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns the error from creating or writing the file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        self.write_to(BufWriter::new(File::create(path)?))
    }
}
