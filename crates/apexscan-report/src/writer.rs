//! Writes the three report documents for a run.

use crate::error::{ReportError, Result};
use crate::formats::{html, json, text};
use apexscan_scanner::RunResult;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp format shared by the three file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where the documents of one run were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Structured JSON document
    pub json_report: PathBuf,
    /// Styled HTML document
    pub html_report: PathBuf,
    /// Plain-text summary
    pub summary_report: PathBuf,
}

/// Renders a [`RunResult`] into an output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer for `output_dir`. The directory is created on write.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Target directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write all three documents stamped with the current local time.
    pub fn write(&self, result: &RunResult) -> Result<ReportPaths> {
        self.write_at(result, Local::now())
    }

    /// Write all three documents stamped with `generated_at`.
    pub fn write_at(
        &self,
        result: &RunResult,
        generated_at: DateTime<Local>,
    ) -> Result<ReportPaths> {
        tracing::info!("Generating security report...");
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| ReportError::io(&self.output_dir, e))?;

        let stamp = generated_at.format(FILE_TIMESTAMP_FORMAT).to_string();
        let paths = ReportPaths {
            json_report: self.output_dir.join(format!("security_report_{stamp}.json")),
            html_report: self.output_dir.join(format!("security_report_{stamp}.html")),
            summary_report: self.output_dir.join(format!("security_summary_{stamp}.txt")),
        };

        write_file(&paths.json_report, &json::generate(result)?)?;
        write_file(&paths.html_report, &html::generate(result, generated_at))?;
        write_file(&paths.summary_report, &text::generate(result, generated_at))?;

        tracing::info!("✓ Security reports generated:");
        tracing::info!("  - JSON: {}", paths.json_report.display());
        tracing::info!("  - HTML: {}", paths.html_report.display());
        tracing::info!("  - Summary: {}", paths.summary_report.display());

        Ok(paths)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}
