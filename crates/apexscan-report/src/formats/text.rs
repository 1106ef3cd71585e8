//! Plain-text summary.

use apexscan_scanner::{ProbeCategory, ProbeResult, RunResult, VulnerabilitySummary};
use chrono::{DateTime, Local};

/// Generate the text summary.
#[must_use]
pub fn generate(result: &RunResult, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str(&generate_header(result, generated_at));
    out.push_str(&generate_summary(&result.vulnerability_summary));
    out.push_str(&generate_recommendations(result));
    out.push_str(&generate_probe_tally(&result.specific_tests));

    out
}

fn generate_header(result: &RunResult, generated_at: DateTime<Local>) -> String {
    format!(
        "APEXSHARE SECURITY SCAN SUMMARY\n{}\n\nScan Date: {}\nTarget: {}\nAPI: {}\n\n",
        "=".repeat(50),
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        result.scan_info.target_url,
        result.scan_info.api_url
    )
}

fn generate_summary(summary: &VulnerabilitySummary) -> String {
    format!(
        "VULNERABILITY SUMMARY:
  Total: {}
  High Risk: {}
  Medium Risk: {}
  Low Risk: {}
  Informational: {}

",
        summary.total_vulnerabilities,
        summary.high_risk,
        summary.medium_risk,
        summary.low_risk,
        summary.informational
    )
}

fn generate_recommendations(result: &RunResult) -> String {
    let mut out = String::from("RECOMMENDATIONS:\n");
    for (i, rec) in result.recommendations.iter().enumerate() {
        out.push_str(&format!(
            "  {}. [{}] {}\n     Action: {}\n\n",
            i + 1,
            rec.priority,
            rec.issue,
            rec.action
        ));
    }
    out
}

fn generate_probe_tally(probes: &[ProbeResult]) -> String {
    let mut out = String::from("TARGETED PROBES:\n");
    for category in ProbeCategory::ALL {
        let tally = Tally::of(probes, category);
        if tally.total == 0 {
            continue;
        }
        out.push_str(&format!(
            "  {}: {} run, {} flagged, {} errors\n",
            category, tally.total, tally.flagged, tally.errors
        ));
    }
    out
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    total: usize,
    flagged: usize,
    errors: usize,
}

impl Tally {
    fn of(probes: &[ProbeResult], category: ProbeCategory) -> Self {
        probes
            .iter()
            .filter(|p| p.category == category)
            .fold(Self::default(), |mut tally, probe| {
                tally.total += 1;
                if probe.transport_failed() {
                    tally.errors += 1;
                } else if probe.is_concern() {
                    tally.flagged += 1;
                }
                tally
            })
    }
}
