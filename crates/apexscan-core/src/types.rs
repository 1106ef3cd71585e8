//! Shared types used across the apexscan workspace.
//!
//! These newtypes and enums model what the scanning engine hands back to us:
//! targets, job handles, progress percentages and alerts.

use crate::error::ApexError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Base URL of a deployment under test (frontend or API origin).
///
/// Only `http` and `https` URLs with a host are accepted. The trailing slash
/// is dropped so that pattern and path composition stay predictable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanTarget(String);

impl ScanTarget {
    /// Create a new `ScanTarget` from a URL string.
    ///
    /// # Errors
    /// Returns error if the URL is not an absolute `http(s)` URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ApexError> {
        let url = url.into();
        Self::validate(&url)?;
        Ok(Self(url.trim_end_matches('/').to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scope include pattern covering everything under this origin.
    #[must_use]
    pub fn origin_pattern(&self) -> String {
        format!("{}/*", self.0)
    }

    /// Append a path to the base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }

    fn validate(url: &str) -> Result<(), ApexError> {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = URL_REGEX.get_or_init(|| {
            Regex::new(r"^https?://[A-Za-z0-9.\-]+(:[0-9]{1,5})?(/\S*)?$").expect("valid regex")
        });

        if regex.is_match(url) {
            Ok(())
        } else {
            Err(ApexError::Validation(format!(
                "invalid scan target: expected an absolute http(s) URL, got '{url}'"
            )))
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named scope the engine is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeContext {
    /// Context name registered with the engine
    pub name: String,
    /// Include patterns, applied in order
    pub include: Vec<String>,
    /// Exclude patterns, applied in order after the includes
    pub exclude: Vec<String>,
}

/// Identifier of a spider or active-scan job as issued by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap an engine-issued job identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job progress as a percentage, clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Progress(u8);

impl Progress {
    /// A finished job.
    pub const COMPLETE: Progress = Progress(100);

    /// Create a progress value, clamping anything above 100.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(percent: u32) -> Self {
        Self(percent.min(100) as u8)
    }

    /// Percentage value.
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }

    /// Whether the job has reached its terminal state.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 >= 100
    }
}

impl FromStr for Progress {
    type Err = ApexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self::new)
            .map_err(|e| ApexError::Validation(format!("invalid progress value '{s}': {e}")))
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Alert severity as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// High risk
    High,
    /// Medium risk
    Medium,
    /// Low risk
    Low,
    /// Informational
    Informational,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 4] = [
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Informational,
    ];

    /// Map an engine risk string onto a severity.
    ///
    /// Anything unrecognized is treated as informational.
    #[must_use]
    pub fn from_risk(risk: &str) -> Self {
        match risk.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Informational,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Informational => "Informational",
        }
    }

    /// CSS class used by the HTML report.
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "risk-high",
            Self::Medium => "risk-medium",
            Self::Low => "risk-low",
            Self::Informational => "risk-info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single finding raised by the engine.
///
/// Field names follow the engine's JSON so alerts round-trip verbatim into
/// the structured report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    /// Engine-side alert id
    pub id: String,
    /// Scan rule that raised the alert
    pub plugin_id: String,
    /// Alert name / category
    #[serde(rename = "alert")]
    pub name: String,
    /// Raw risk string (`High`, `Medium`, `Low`, `Informational`)
    pub risk: String,
    /// Engine confidence
    pub confidence: String,
    /// Free-text description
    #[serde(alias = "desc")]
    pub description: String,
    /// URL the alert was raised against
    pub url: String,
    /// HTTP method of the offending request
    pub method: String,
    /// Affected parameter
    pub param: String,
    /// Evidence snippet
    pub evidence: String,
    /// Suggested solution
    pub solution: String,
    /// Reference links
    pub reference: String,
    /// CWE identifier
    #[serde(rename = "cweid")]
    pub cwe_id: String,
}

impl Alert {
    /// Create an alert with the fields the reports rely on.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        risk: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            risk: risk.into(),
            description: description.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Severity derived from the raw risk string.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_risk(&self.risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_target_valid() {
        let valid = vec![
            "https://apexshare.be",
            "https://api.apexshare.be/",
            "http://localhost:3000",
            "http://127.0.0.1:8080/app",
        ];

        for url in valid {
            assert!(ScanTarget::new(url).is_ok(), "Failed for: {url}");
        }
    }

    #[test]
    fn test_scan_target_invalid() {
        let invalid = vec!["apexshare.be", "ftp://apexshare.be", "https://", "", "https://a b"];

        for url in invalid {
            assert!(ScanTarget::new(url).is_err(), "Should fail for: {url}");
        }
    }

    #[test]
    fn test_scan_target_patterns() {
        let target = ScanTarget::new("https://api.apexshare.be/").expect("valid target");
        assert_eq!(target.as_str(), "https://api.apexshare.be");
        assert_eq!(target.origin_pattern(), "https://api.apexshare.be/*");
        assert_eq!(target.join("/upload"), "https://api.apexshare.be/upload");
        assert_eq!(target.join("download/1"), "https://api.apexshare.be/download/1");
    }

    #[test]
    fn test_progress_parse_and_clamp() {
        let p: Progress = "42".parse().expect("parse progress");
        assert_eq!(p.percent(), 42);
        assert!(!p.is_complete());

        let p: Progress = "100".parse().expect("parse progress");
        assert!(p.is_complete());

        assert_eq!(Progress::new(250), Progress::COMPLETE);
        assert!("abc".parse::<Progress>().is_err());
        assert_eq!(Progress::new(7).to_string(), "7%");
    }

    #[test]
    fn test_severity_from_risk() {
        assert_eq!(Severity::from_risk("High"), Severity::High);
        assert_eq!(Severity::from_risk("medium"), Severity::Medium);
        assert_eq!(Severity::from_risk("Low"), Severity::Low);
        assert_eq!(Severity::from_risk("Informational"), Severity::Informational);
        assert_eq!(Severity::from_risk("Critical"), Severity::Informational);
        assert_eq!(Severity::from_risk(""), Severity::Informational);
    }

    #[test]
    fn test_alert_deserializes_engine_json() {
        let json = r#"{
            "id": "7",
            "pluginId": "40012",
            "alert": "Cross Site Scripting (Reflected)",
            "name": "Cross Site Scripting (Reflected)",
            "risk": "High",
            "confidence": "Medium",
            "description": "XSS found",
            "url": "https://apexshare.be/search?q=x",
            "param": "q",
            "cweid": "79",
            "tags": {"OWASP_2021_A03": "https://owasp.org"}
        }"#;

        let alert: Alert = serde_json::from_str(json).expect("deserialize alert");
        assert_eq!(alert.name, "Cross Site Scripting (Reflected)");
        assert_eq!(alert.severity(), Severity::High);
        assert_eq!(alert.plugin_id, "40012");
        assert_eq!(alert.cwe_id, "79");
        assert_eq!(alert.param, "q");
    }

    #[test]
    fn test_alert_accepts_short_description_key() {
        let json = r#"{"alert": "X", "risk": "Low", "desc": "short", "url": "u"}"#;
        let alert: Alert = serde_json::from_str(json).expect("deserialize alert");
        assert_eq!(alert.description, "short");
        assert_eq!(alert.severity(), Severity::Low);
    }
}
