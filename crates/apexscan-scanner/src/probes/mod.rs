//! Targeted probes against the API origin.
//!
//! Five sub-suites run in a fixed order and their results are concatenated:
//! injection, malicious upload, authorization, input validation and CORS.
//! Every probe is submitted through the engine so it shows up in the engine's
//! history next to the spider and active-scan traffic.
//!
//! A probe whose request cannot be delivered is recorded with the `ERROR`
//! status and a negative verdict; the suite carries on with the next probe.
//! Cancellation stops the suite before the next request is sent.

mod authz;
mod cors;
mod injection;
mod input_validation;
pub mod transport;
mod upload;

pub use transport::{ProbeOutcome, ProbeTransport};

use crate::error::Result;
use apexscan_core::{ProbeConfig, ScanTarget};
use apexscan_zap::ScanEngine;
use serde::{Serialize, Serializer};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Sub-suite a probe belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeCategory {
    /// SQL and NoSQL injection
    Injection,
    /// Dangerous or oversized uploads
    Upload,
    /// Access to resources without credentials
    Authorization,
    /// Script payloads in free-text fields
    InputValidation,
    /// Cross-origin preflight handling
    Cors,
}

impl ProbeCategory {
    /// Categories in execution order.
    pub const ALL: [ProbeCategory; 5] = [
        ProbeCategory::Injection,
        ProbeCategory::Upload,
        ProbeCategory::Authorization,
        ProbeCategory::InputValidation,
        ProbeCategory::Cors,
    ];

    /// Human-readable name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Injection => "Injection",
            Self::Upload => "File Upload",
            Self::Authorization => "Authorization",
            Self::InputValidation => "Input Validation",
            Self::Cors => "CORS",
        }
    }
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What a probe put on the wire, keyed by its kind in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeInput {
    /// Injection or script payload
    Payload(String),
    /// Declared MIME type of a crafted upload (`unknown` when none)
    FileType(String),
    /// Resource identifier
    FileId(String),
    /// `Origin` header value
    Origin(String),
}

impl ProbeInput {
    /// The raw input value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Payload(v) | Self::FileType(v) | Self::FileId(v) | Self::Origin(v) => v,
        }
    }
}

/// Observed status of a probe: a response code, or `ERROR` when the request
/// never completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// HTTP status code of the response
    Code(u16),
    /// Transport failure
    Error,
}

impl ProbeStatus {
    /// The status code, if there was a response.
    #[must_use]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(code),
            Self::Error => None,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl Serialize for ProbeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Code(code) => serializer.serialize_u16(*code),
            Self::Error => serializer.serialize_str("ERROR"),
        }
    }
}

/// Per-category verdict. The flag is the outcome of the category's predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The injection payload was accepted (status 200)
    Vulnerable(bool),
    /// The upload was refused with a rejection status
    Rejected(bool),
    /// The resource was withheld with a protection status
    ProperlyProtected(bool),
    /// The script payload was refused with a rejection status
    ProperlySanitized(bool),
    /// The preflight answered with `Access-Control-Allow-Origin` (informational)
    AllowsOrigin(bool),
}

impl Verdict {
    /// Report key of the verdict.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vulnerable(_) => "vulnerable",
            Self::Rejected(_) => "rejected",
            Self::ProperlyProtected(_) => "properly_protected",
            Self::ProperlySanitized(_) => "properly_sanitized",
            Self::AllowsOrigin(_) => "allows_origin",
        }
    }

    /// The predicate outcome.
    #[must_use]
    pub fn holds(&self) -> bool {
        match self {
            Self::Vulnerable(v)
            | Self::Rejected(v)
            | Self::ProperlyProtected(v)
            | Self::ProperlySanitized(v)
            | Self::AllowsOrigin(v) => *v,
        }
    }

    /// Whether the outcome deserves attention in the reports.
    #[must_use]
    pub fn is_concern(&self) -> bool {
        match self {
            Self::Vulnerable(v) | Self::AllowsOrigin(v) => *v,
            Self::Rejected(v) | Self::ProperlyProtected(v) | Self::ProperlySanitized(v) => !*v,
        }
    }
}

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Test name
    pub test: String,
    /// Sub-suite
    pub category: ProbeCategory,
    /// Input put on the wire
    #[serde(flatten)]
    pub input: ProbeInput,
    /// Observed status
    pub response_code: ProbeStatus,
    /// Verdict of the category predicate
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl ProbeResult {
    /// Whether the request never completed.
    #[must_use]
    pub fn transport_failed(&self) -> bool {
        self.response_code == ProbeStatus::Error
    }

    /// Whether a completed probe produced a worrying verdict.
    #[must_use]
    pub fn is_concern(&self) -> bool {
        !self.transport_failed() && self.verdict.is_concern()
    }
}

/// Upload request body shared by the injection, upload and input-validation
/// probes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    student_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trainer_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    file_name: String,
    file_size: u64,
    content_type: &'a str,
    session_date: &'a str,
}

const DEFAULT_FILE_SIZE: u64 = 1024;
const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

/// The probe suite bound to one API origin.
pub struct ProbeSuite<'a> {
    transport: ProbeTransport<'a>,
    config: &'a ProbeConfig,
    api: &'a ScanTarget,
}

impl<'a> ProbeSuite<'a> {
    /// Create a suite that probes `api` through `engine`.
    #[must_use]
    pub fn new(
        engine: &'a dyn ScanEngine,
        config: &'a ProbeConfig,
        api: &'a ScanTarget,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            transport: ProbeTransport::new(engine, cancel),
            config,
            api,
        }
    }

    /// Run every sub-suite in order and concatenate the results.
    pub async fn run_all(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing for ApexShare-specific vulnerabilities...");

        let mut results = Vec::new();
        results.extend(self.injection().await?);
        results.extend(self.upload().await?);
        results.extend(self.authorization().await?);
        results.extend(self.input_validation().await?);
        results.extend(self.cors().await?);

        let concerns = results.iter().filter(|r| r.is_concern()).count();
        tracing::info!(
            probes = results.len(),
            concerns,
            "✓ Targeted probes completed"
        );
        Ok(results)
    }

    fn upload_url(&self) -> String {
        self.api.join(&self.config.upload_path)
    }

    fn download_url(&self, id: &str) -> String {
        let prefix = self.config.download_path.trim_end_matches('/');
        self.api.join(&format!("{prefix}/{}", encode_path(id)))
    }

    fn upload_body(&self, email: String, file_name: String) -> UploadRequest<'a> {
        UploadRequest {
            student_email: email,
            student_name: None,
            trainer_name: None,
            notes: None,
            file_name,
            file_size: DEFAULT_FILE_SIZE,
            content_type: DEFAULT_CONTENT_TYPE,
            session_date: &self.config.session_date,
        }
    }

    fn is_rejection(&self, status: ProbeStatus) -> bool {
        status
            .code()
            .is_some_and(|code| self.config.rejection_statuses.contains(&code))
    }
}

/// Percent-encode each `/`-separated segment of `value`.
///
/// Separators survive so traversal identifiers reach the server unchanged.
fn encode_path(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
