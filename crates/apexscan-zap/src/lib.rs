//! apexscan ZAP - Scan-control client for the OWASP ZAP engine.
//!
//! The workflow never talks HTTP to the engine directly; it goes through the
//! [`ScanEngine`] trait so tests can substitute a scripted engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use apexscan_zap::{ScanEngine, ZapClient};
//!
//! let zap = ZapClient::with_url("http://localhost:8080")?;
//! println!("ZAP {}", zap.version().await?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod engine;
pub mod error;
pub mod message;

// Re-export commonly used types
pub use client::ZapClient;
pub use engine::ScanEngine;
pub use error::{EngineError, Result};
pub use message::{HttpMessage, RawRequest};
pub use reqwest::Method;
