//! The aggregate result of one scan run.

use crate::active::ActiveScanOutcome;
use crate::analysis::{derive_recommendations, Recommendation, VulnerabilitySummary};
use crate::discovery::DiscoveryOutcome;
use crate::probes::ProbeResult;
use apexscan_core::Alert;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanInfo {
    /// Frontend origin
    pub target_url: String,
    /// API origin
    pub api_url: String,
    /// When the run started
    pub start_time: DateTime<Local>,
    /// When the last stage finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Local>>,
    /// Engine version reported by the connection check
    pub zap_version: String,
    /// Scope context id
    pub context_id: String,
}

/// Everything a run produced, in the order the stages populate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Run metadata
    pub scan_info: ScanInfo,
    /// Spider outcome per target
    pub spider_results: Vec<DiscoveryOutcome>,
    /// Active-scan outcome per target
    pub active_scan_results: Vec<ActiveScanOutcome>,
    /// Targeted probe outcomes
    pub specific_tests: Vec<ProbeResult>,
    /// Severity counts over all active-scan alerts
    pub vulnerability_summary: VulnerabilitySummary,
    /// Remediation hints
    pub recommendations: Vec<Recommendation>,
}

impl RunResult {
    /// Start an empty result.
    #[must_use]
    pub fn new(scan_info: ScanInfo) -> Self {
        Self {
            scan_info,
            spider_results: Vec::new(),
            active_scan_results: Vec::new(),
            specific_tests: Vec::new(),
            vulnerability_summary: VulnerabilitySummary::default(),
            recommendations: Vec::new(),
        }
    }

    /// Every alert from every active-scan target.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.active_scan_results
            .iter()
            .flat_map(|outcome| outcome.alerts.iter())
    }

    /// Compute the severity summary and the recommendations.
    pub fn analyze(&mut self) {
        tracing::info!("Analyzing security scan results...");
        self.vulnerability_summary = VulnerabilitySummary::from_alerts(self.alerts());
        self.recommendations = derive_recommendations(&self.vulnerability_summary);
    }

    /// Stamp the end time.
    pub fn finish(&mut self) {
        self.scan_info.end_time = Some(Local::now());
    }
}
