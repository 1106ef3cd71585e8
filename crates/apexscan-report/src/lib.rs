//! apexscan Report - Renders a scan run into its report documents.
//!
//! Three documents are produced from one `RunResult` and one generation
//! timestamp:
//!
//! - `security_report_{ts}.json` - full-fidelity structured result
//! - `security_report_{ts}.html` - styled report with alert details
//! - `security_summary_{ts}.txt` - counts, recommendations and probe tally
//!
//! `{ts}` is the local time formatted as `YYYYMMDD_HHMMSS`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod formats;
pub mod writer;

// Re-export commonly used types
pub use error::{ReportError, Result};
pub use writer::{ReportPaths, ReportWriter, FILE_TIMESTAMP_FORMAT};
