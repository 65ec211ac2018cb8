// # Diff Reports
//
// Plain-text diff reports, one per detected change that had a predecessor
// snapshot.
//
// ## Format
//
// ```text
// === 2024-03-05T12-30-00-000Z DIFF ===
// Old: 2024-03-01-d4735e3a265e.json
// New: 2024-03-05-4e07408562be.json
//
// <diff tool stdout>
//
// [stderr]
// <diff tool stderr, only when non-empty>
// ```
//
// Reports are named by generation time, not capture date: they describe the
// run that produced them. Both snapshot names appear in the header so a diff
// can always be reproduced from the immutable snapshots.

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::PathBuf;
use tokio::fs;

use crate::Error;
use crate::traits::diff_tool::DiffOutput;

/// Diff report directory handle
#[derive(Debug, Clone)]
pub struct DiffReporter {
    diffs_dir: PathBuf,
}

impl DiffReporter {
    /// Create a handle for a report directory
    pub fn new(diffs_dir: impl Into<PathBuf>) -> Self {
        Self {
            diffs_dir: diffs_dir.into(),
        }
    }

    /// Create the report directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.diffs_dir).await.map_err(|e| {
            Error::archive(format!(
                "Failed to create diffs directory {}: {}",
                self.diffs_dir.display(),
                e
            ))
        })
    }

    /// Filesystem-safe stamp for report names and headers
    ///
    /// RFC 3339 with `:` and `.` replaced, e.g. `2024-03-05T12-30-00-000Z`.
    fn file_stamp(generated_at: DateTime<Utc>) -> String {
        generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-")
    }

    /// Render the report body
    fn render(stamp: &str, old_name: &str, new_name: &str, output: &DiffOutput) -> String {
        let mut report = format!(
            "=== {} DIFF ===\nOld: {}\nNew: {}\n\n{}\n",
            stamp, old_name, new_name, output.stdout
        );
        if !output.stderr.is_empty() {
            report.push_str(&format!("\n[stderr]\n{}\n", output.stderr));
        }
        report
    }

    /// Write a report for one change
    ///
    /// # Parameters
    ///
    /// - `generated_at`: report generation time (names the file)
    /// - `old_name` / `new_name`: the two snapshot file names
    /// - `output`: captured diff tool output, embedded verbatim
    pub async fn write(
        &self,
        generated_at: DateTime<Utc>,
        old_name: &str,
        new_name: &str,
        output: &DiffOutput,
    ) -> Result<PathBuf, Error> {
        let stamp = Self::file_stamp(generated_at);
        let path = self.diffs_dir.join(format!("{}.txt", stamp));
        let report = Self::render(&stamp, old_name, new_name, output);

        fs::write(&path, report).await.map_err(|e| {
            Error::archive(format!(
                "Failed to write diff report {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!("Diff report written to {}", path.display());
        Ok(path)
    }
}
