//! Severity aggregation and recommendation rules.

use apexscan_core::{Alert, Severity};
use serde::Serialize;

/// Alerts partitioned by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBuckets {
    /// High-risk alerts
    #[serde(rename = "High")]
    pub high: Vec<Alert>,
    /// Medium-risk alerts
    #[serde(rename = "Medium")]
    pub medium: Vec<Alert>,
    /// Low-risk alerts
    #[serde(rename = "Low")]
    pub low: Vec<Alert>,
    /// Informational alerts, including unrecognized risk strings
    #[serde(rename = "Informational")]
    pub informational: Vec<Alert>,
}

impl SeverityBuckets {
    /// Partition `alerts`. Every alert lands in exactly one bucket.
    pub fn partition<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Self {
        let mut buckets = Self::default();
        for alert in alerts {
            buckets.bucket_mut(alert.severity()).push(alert.clone());
        }
        buckets
    }

    /// Alerts of one severity.
    #[must_use]
    pub fn bucket(&self, severity: Severity) -> &[Alert] {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
            Severity::Informational => &self.informational,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Alert> {
        match severity {
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
            Severity::Informational => &mut self.informational,
        }
    }

    /// Number of alerts across all buckets.
    #[must_use]
    pub fn total(&self) -> usize {
        Severity::ALL.iter().map(|s| self.bucket(*s).len()).sum()
    }
}

/// Severity counts plus the bucketed alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VulnerabilitySummary {
    /// Total number of alerts
    pub total_vulnerabilities: usize,
    /// High-risk count
    pub high_risk: usize,
    /// Medium-risk count
    pub medium_risk: usize,
    /// Low-risk count
    pub low_risk: usize,
    /// Informational count
    pub informational: usize,
    /// The alerts behind the counts
    pub by_category: SeverityBuckets,
}

impl VulnerabilitySummary {
    /// Summarize `alerts`.
    pub fn from_alerts<'a>(alerts: impl IntoIterator<Item = &'a Alert>) -> Self {
        let by_category = SeverityBuckets::partition(alerts);
        Self {
            total_vulnerabilities: by_category.total(),
            high_risk: by_category.high.len(),
            medium_risk: by_category.medium.len(),
            low_risk: by_category.low.len(),
            informational: by_category.informational.len(),
            by_category,
        }
    }

    /// Count for one severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.by_category.bucket(severity).len()
    }
}

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Blocks a production deployment
    Critical,
    /// Fix soon
    High,
    /// Nothing to act on
    Info,
}

impl Priority {
    /// Label used in the reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remediation hint derived from the alert set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Urgency
    pub priority: Priority,
    /// What was found
    pub issue: String,
    /// What to do about it
    pub action: String,
}

impl Recommendation {
    fn new(priority: Priority, issue: impl Into<String>, action: &str) -> Self {
        Self {
            priority,
            issue: issue.into(),
            action: action.to_string(),
        }
    }
}

/// Apply the recommendation rules in order.
///
/// Rules fire independently and are not deduplicated; the fallback entry is
/// emitted only when nothing else fired.
#[must_use]
pub fn derive_recommendations(summary: &VulnerabilitySummary) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let buckets = &summary.by_category;

    if summary.high_risk > 0 {
        recommendations.push(Recommendation::new(
            Priority::Critical,
            format!("{} high-risk vulnerabilities found", summary.high_risk),
            "Immediate remediation required before production deployment",
        ));
    }

    if summary.medium_risk > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            format!("{} medium-risk vulnerabilities found", summary.medium_risk),
            "Plan remediation within current sprint",
        ));
    }

    if any_named(buckets, "Cross Site Scripting") {
        recommendations.push(Recommendation::new(
            Priority::High,
            "XSS vulnerabilities detected",
            "Implement proper input validation and output encoding",
        ));
    }

    if any_named(buckets, "SQL Injection") {
        recommendations.push(Recommendation::new(
            Priority::Critical,
            "SQL injection vulnerabilities detected",
            "Use parameterized queries and input validation",
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            Priority::Info,
            "No critical security issues found",
            "Continue regular security testing and monitoring",
        ));
    }

    recommendations
}

fn any_named(buckets: &SeverityBuckets, needle: &str) -> bool {
    Severity::ALL
        .iter()
        .flat_map(|s| buckets.bucket(*s))
        .any(|alert| alert.name.contains(needle))
}
