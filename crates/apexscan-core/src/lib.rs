//! apexscan core - Foundation crate for the apexscan workspace.
//!
//! Provides the shared types, error handling and configuration that the
//! engine client, the scan drivers and the report renderers depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based scan configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`ScanTarget`, `JobId`, `Progress`, `Alert`)
//!
//! # Example
//!
//! ```rust
//! use apexscan_core::{ScanConfig, Severity};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default();
//! let api = config.api()?;
//! assert_eq!(api.origin_pattern(), "https://api.apexshare.be/*");
//! assert_eq!(Severity::from_risk("unknown"), Severity::Informational);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    ActiveScanConfig, EngineConfig, HeaderRule, ProbeConfig, ReportConfig, ScanConfig,
    ScopeConfig, SpiderConfig, TargetConfig, UploadCase,
};
pub use error::{ApexError, ConfigError, ConfigResult, Result};
pub use types::{Alert, JobId, Progress, ScanTarget, ScopeContext, Severity};
