//! apexscan Scanner - Scan workflow orchestration.
//!
//! This crate drives the scanning engine through a complete assessment of a
//! deployment: scope configuration, spider and active scans of the frontend
//! and API origins, targeted probes against the API, and the severity
//! analysis that feeds the reports.
//!
//! # Features
//!
//! - Fixed-interval polling with an optional deadline and cancellation
//! - Remote jobs are stopped when a wait is abandoned
//! - Probe transport failures are recorded, never fatal
//! - Deterministic recommendation rules
//!
//! # Example
//!
//! ```rust,ignore
//! use apexscan_scanner::ScanOrchestrator;
//! use apexscan_zap::ZapClient;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(ZapClient::from_config(&config.engine)?);
//! let result = ScanOrchestrator::new(engine, config).run().await?;
//! println!("{} alerts", result.vulnerability_summary.total_vulnerabilities);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod active;
pub mod analysis;
pub mod discovery;
#[allow(missing_docs)]
pub mod error;
pub mod orchestrator;
pub mod poll;
pub mod probes;
pub mod run;
pub mod scope;

// Re-export commonly used types
pub use active::{ActiveScanDriver, ActiveScanOutcome};
pub use analysis::{
    derive_recommendations, Priority, Recommendation, SeverityBuckets, VulnerabilitySummary,
};
pub use discovery::{DiscoveryDriver, DiscoveryOutcome};
pub use error::{Result, ScanError, Stage};
pub use orchestrator::ScanOrchestrator;
pub use poll::{wait_for_completion, PollSettings};
pub use probes::{
    ProbeCategory, ProbeInput, ProbeOutcome, ProbeResult, ProbeStatus, ProbeSuite, Verdict,
};
pub use run::{RunResult, ScanInfo};
pub use scope::{configure_scope, scope_context};
