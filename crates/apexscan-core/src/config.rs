//! Configuration management for apexscan.
//!
//! Every fixed value the scan workflow relies on (scope patterns, spider
//! limits, poll intervals, probe payloads, verdict status sets) lives here so
//! components receive it explicitly instead of reading globals.

use crate::error::{ConfigError, ConfigResult};
use crate::types::ScanTarget;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main scan configuration.
///
/// Loaded from `~/.config/apexscan/config.toml` (or platform equivalent) or an
/// explicit path. Missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Deployment under test
    pub target: TargetConfig,
    /// Scanning engine connection
    pub engine: EngineConfig,
    /// Scope context and header rules
    pub scope: ScopeConfig,
    /// Spider (discovery) settings
    pub spider: SpiderConfig,
    /// Active scan settings
    pub active_scan: ActiveScanConfig,
    /// Targeted probe suite settings
    pub probes: ProbeConfig,
    /// Report output settings
    pub report: ReportConfig,
}

impl ScanConfig {
    /// Load configuration from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. The default location is optional; when it
    /// is absent the defaults are used.
    ///
    /// # Errors
    /// Returns error if:
    /// - An explicit file is missing
    /// - The file cannot be read or is not valid TOML
    ///
    /// The result is not validated; callers apply their overrides first and
    /// then call [`ScanConfig::validate`].
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::load_from(path)
            }
            None => match Self::config_path() {
                Ok(default_path) if default_path.exists() => Self::load_from(&default_path),
                _ => {
                    tracing::debug!("Config file not found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a configuration file without validating it.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the path to the default configuration file.
    ///
    /// Uses XDG base directories: `~/.config/apexscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("be", "apexshare", "apexscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Frontend origin as a validated target.
    pub fn target(&self) -> ConfigResult<ScanTarget> {
        ScanTarget::new(self.target.target_url.clone()).map_err(|e| ConfigError::InvalidValue {
            field: "target.target_url".to_string(),
            reason: e.to_string(),
        })
    }

    /// API origin as a validated target.
    pub fn api(&self) -> ConfigResult<ScanTarget> {
        ScanTarget::new(self.target.api_url.clone()).map_err(|e| ConfigError::InvalidValue {
            field: "target.api_url".to_string(),
            reason: e.to_string(),
        })
    }

    /// Check the values the workflow cannot run without.
    pub fn validate(&self) -> ConfigResult<()> {
        self.target()?;
        self.api()?;

        let engine_url = &self.engine.api_url;
        if !(engine_url.starts_with("http://") || engine_url.starts_with("https://")) {
            return Err(invalid("engine.api_url", "must be an http(s) URL"));
        }
        if self.spider.poll_interval_secs == 0 {
            return Err(invalid("spider.poll_interval_secs", "must be greater than zero"));
        }
        if self.spider.timeout_secs == Some(0) {
            return Err(invalid("spider.timeout_secs", "must be greater than zero when set"));
        }
        if self.active_scan.poll_interval_secs == 0 {
            return Err(invalid(
                "active_scan.poll_interval_secs",
                "must be greater than zero",
            ));
        }
        if self.active_scan.timeout_secs == Some(0) {
            return Err(invalid(
                "active_scan.timeout_secs",
                "must be greater than zero when set",
            ));
        }
        if self.active_scan.policy_name.trim().is_empty() {
            return Err(invalid("active_scan.policy_name", "must not be empty"));
        }
        if self.scope.context_name.trim().is_empty() {
            return Err(invalid("scope.context_name", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Deployment under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Frontend origin
    pub target_url: String,
    /// API origin
    pub api_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            target_url: "https://apexshare.be".to_string(),
            api_url: "https://api.apexshare.be".to_string(),
        }
    }
}

/// Scanning engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the engine's control API
    pub api_url: String,
    /// API key, if the engine requires one
    pub api_key: Option<String>,
    /// Per-call timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

/// A request header the engine injects into every outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRule {
    /// Header name
    pub name: String,
    /// Header value
    pub value: String,
}

impl HeaderRule {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Scope context settings.
///
/// The target and API origins are always included; `extra_includes` are
/// appended after them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Context name registered with the engine
    pub context_name: String,
    /// Additional include patterns
    pub extra_includes: Vec<String>,
    /// Exclude patterns
    pub excluded_urls: Vec<String>,
    /// Header substitution rules
    pub header_rules: Vec<HeaderRule>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            context_name: "ApexShare".to_string(),
            extra_includes: Vec::new(),
            excluded_urls: vec!["/admin/".to_string(), "/internal/".to_string()],
            header_rules: vec![
                HeaderRule::new("Content-Type", "application/json"),
                HeaderRule::new("User-Agent", "OWASP-ZAP-Security-Scanner"),
                HeaderRule::new("Accept", "application/json"),
            ],
        }
    }
}

/// Spider (discovery) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiderConfig {
    /// Maximum children crawled per node
    pub max_children: u32,
    /// Crawl recursively
    pub recurse: bool,
    /// Stay within the target's subtree
    pub subtree_only: bool,
    /// Seconds between progress polls
    pub poll_interval_secs: u64,
    /// Give up waiting after this many seconds (unbounded when unset)
    pub timeout_secs: Option<u64>,
}

impl SpiderConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Wait deadline as a `Duration`, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            max_children: 10,
            recurse: true,
            subtree_only: true,
            poll_interval_secs: 5,
            timeout_secs: None,
        }
    }
}

/// Active scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveScanConfig {
    /// Named scan policy
    pub policy_name: String,
    /// Scan recursively
    pub recurse: bool,
    /// Only attack URLs inside the scope context
    pub in_scope_only: bool,
    /// Seconds between progress polls
    pub poll_interval_secs: u64,
    /// Give up waiting after this many seconds (unbounded when unset)
    pub timeout_secs: Option<u64>,
}

impl ActiveScanConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Wait deadline as a `Duration`, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ActiveScanConfig {
    fn default() -> Self {
        Self {
            policy_name: "Default Policy".to_string(),
            recurse: true,
            in_scope_only: true,
            poll_interval_secs: 10,
            timeout_secs: None,
        }
    }
}

/// A crafted upload request descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCase {
    /// File name sent in the upload request
    pub name: String,
    /// Declared MIME type (the probe falls back to `video/mp4`)
    #[serde(default)]
    pub content_type: Option<String>,
    /// Declared size in bytes (the probe falls back to 1024)
    #[serde(default)]
    pub size: Option<u64>,
}

/// Targeted probe suite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Upload endpoint path on the API origin
    pub upload_path: String,
    /// Download endpoint path prefix on the API origin
    pub download_path: String,
    /// Session date placed in upload bodies
    pub session_date: String,
    /// SQL-style injection payloads
    pub sql_payloads: Vec<String>,
    /// NoSQL-style injection payloads
    pub nosql_payloads: Vec<String>,
    /// Script-injection payloads
    pub xss_payloads: Vec<String>,
    /// Resource identifiers for the authorization probes
    pub file_ids: Vec<String>,
    /// Origins for the cross-origin probes
    pub cors_origins: Vec<String>,
    /// Status codes that count as "request rejected"
    pub rejection_statuses: Vec<u16>,
    /// Status codes that count as "resource protected"
    pub protected_statuses: Vec<u16>,
    /// Crafted upload descriptors
    pub malicious_uploads: Vec<UploadCase>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            upload_path: "/upload".to_string(),
            download_path: "/download".to_string(),
            session_date: "2025-01-20".to_string(),
            sql_payloads: strings(&[
                "' OR '1'='1",
                "'; DROP TABLE users; --",
                "' UNION SELECT * FROM information_schema.tables --",
            ]),
            nosql_payloads: strings(&[
                r#"{"$ne": null}"#,
                r#"{"$gt": ""}"#,
                r#"{"$where": "function() { return true; }"}"#,
            ]),
            xss_payloads: strings(&[
                r#"<script>alert("XSS")</script>"#,
                r#"javascript:alert("XSS")"#,
                r#""><script>alert("XSS")</script>"#,
                r#"onload="alert('XSS')""#,
            ]),
            file_ids: strings(&[
                "f47ac10b-58cc-4372-a567-0e02b2c3d479",
                "../../../etc/passwd",
                "admin",
                "null",
                "1",
            ]),
            cors_origins: strings(&["https://evil.com", "http://localhost:3000", "null", "*"]),
            rejection_statuses: vec![400, 413, 415, 422],
            protected_statuses: vec![403, 404, 410],
            malicious_uploads: vec![
                UploadCase {
                    name: "malicious.php".to_string(),
                    content_type: Some("application/x-php".to_string()),
                    size: None,
                },
                UploadCase {
                    name: "script.js".to_string(),
                    content_type: Some("application/javascript".to_string()),
                    size: None,
                },
                UploadCase {
                    name: "executable.exe".to_string(),
                    content_type: Some("application/x-msdownload".to_string()),
                    size: None,
                },
                UploadCase {
                    name: "large_file.mp4".to_string(),
                    content_type: None,
                    size: Some(10 * 1024 * 1024 * 1024),
                },
            ],
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the three report files are written into
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./security-reports"),
        }
    }
}
