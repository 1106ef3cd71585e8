//! HTML Report Generator
//!
//! Generates a styled, self-contained HTML report. Every engine- or
//! payload-derived string is escaped before it is embedded.

use apexscan_core::{Alert, Severity};
use apexscan_scanner::{ProbeResult, RunResult, VulnerabilitySummary};
use chrono::{DateTime, Local};

const TITLE: &str = "ApexShare Security Scan Report";

/// Generate the HTML report.
#[must_use]
pub fn generate(result: &RunResult, generated_at: DateTime<Local>) -> String {
    let mut html = String::new();

    html.push_str(&generate_head());
    html.push_str("<body>\n");
    html.push_str(&generate_report_header(result, generated_at));
    html.push_str(&generate_summary(&result.vulnerability_summary));
    html.push_str(&generate_recommendations(result));
    html.push_str(&generate_alerts(result));
    html.push_str(&generate_probe_table(&result.specific_tests));
    html.push_str("</body>\n</html>\n");

    html
}

fn generate_head() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{TITLE}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .header {{ background: #2c3e50; color: white; padding: 20px; text-align: center; }}
        .summary {{ background: #ecf0f1; padding: 15px; margin: 20px 0; }}
        .risk-high {{ color: #e74c3c; font-weight: bold; }}
        .risk-medium {{ color: #f39c12; font-weight: bold; }}
        .risk-low {{ color: #f1c40f; }}
        .risk-info {{ color: #3498db; }}
        .recommendation {{ background: #e8f5e8; padding: 10px; margin: 10px 0; border-left: 4px solid #27ae60; }}
        .vulnerability {{ background: #fff; border: 1px solid #ddd; padding: 15px; margin: 10px 0; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #ddd; padding: 6px 10px; text-align: left; }}
        th {{ background: #ecf0f1; }}
        tr.concern td {{ background: #fdecea; }}
        tr.error td {{ color: #7f8c8d; }}
        code {{ font-family: monospace; }}
    </style>
</head>
"#
    )
}

fn generate_report_header(result: &RunResult, generated_at: DateTime<Local>) -> String {
    format!(
        r#"<div class="header">
    <h1>{TITLE}</h1>
    <p>Generated on {}</p>
    <p>Target: {} | API: {}</p>
</div>
"#,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        html_escape(&result.scan_info.target_url),
        html_escape(&result.scan_info.api_url)
    )
}

fn generate_summary(summary: &VulnerabilitySummary) -> String {
    let mut html = String::from(
        r#"<div class="summary">
    <h2>Executive Summary</h2>
"#,
    );
    html.push_str(&format!(
        "    <p>Total Vulnerabilities Found: <strong>{}</strong></p>\n    <ul>\n",
        summary.total_vulnerabilities
    ));

    for severity in Severity::ALL {
        html.push_str(&format!(
            "        <li class=\"{}\">{}: {}</li>\n",
            severity.css_class(),
            summary_label(severity),
            summary.count(severity)
        ));
    }

    html.push_str("    </ul>\n</div>\n");
    html
}

fn summary_label(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "High Risk",
        Severity::Medium => "Medium Risk",
        Severity::Low => "Low Risk",
        Severity::Informational => "Informational",
    }
}

fn generate_recommendations(result: &RunResult) -> String {
    let mut html = String::from("<div class=\"recommendations\">\n    <h2>Recommendations</h2>\n");

    for rec in &result.recommendations {
        html.push_str(&format!(
            "    <div class=\"recommendation\"><strong>{}</strong>: {} - {}</div>\n",
            rec.priority,
            html_escape(&rec.issue),
            html_escape(&rec.action)
        ));
    }

    html.push_str("</div>\n");
    html
}

fn generate_alerts(result: &RunResult) -> String {
    let mut html =
        String::from("<div class=\"vulnerabilities\">\n    <h2>Detailed Vulnerabilities</h2>\n");

    for alert in result.alerts() {
        html.push_str(&generate_alert(alert));
    }

    html.push_str("</div>\n");
    html
}

fn generate_alert(alert: &Alert) -> String {
    let severity = alert.severity();
    let name = if alert.name.is_empty() {
        "Unknown"
    } else {
        alert.name.as_str()
    };
    let description = if alert.description.is_empty() {
        "No description"
    } else {
        alert.description.as_str()
    };

    let mut html = format!(
        r#"    <div class="vulnerability">
        <h3 class="{}">{}</h3>
        <p><strong>Risk:</strong> {}</p>
        <p><strong>Description:</strong> {}</p>
        <p><strong>URL:</strong> {}</p>
"#,
        severity.css_class(),
        html_escape(name),
        html_escape(&alert.risk),
        html_escape(description),
        html_escape(&alert.url)
    );

    if !alert.solution.is_empty() {
        html.push_str(&format!(
            "        <p><strong>Solution:</strong> {}</p>\n",
            html_escape(&alert.solution)
        ));
    }
    if !alert.cwe_id.is_empty() && alert.cwe_id != "-1" {
        html.push_str(&format!(
            "        <p><strong>CWE:</strong> CWE-{}</p>\n",
            html_escape(&alert.cwe_id)
        ));
    }

    html.push_str("    </div>\n");
    html
}

fn generate_probe_table(probes: &[ProbeResult]) -> String {
    let mut html = String::from(
        r#"<div class="probes">
    <h2>Targeted Probes</h2>
    <table>
        <tr><th>Test</th><th>Category</th><th>Input</th><th>Status</th><th>Verdict</th></tr>
"#,
    );

    for probe in probes {
        let row_class = if probe.transport_failed() {
            "error"
        } else if probe.is_concern() {
            "concern"
        } else {
            "ok"
        };
        html.push_str(&format!(
            "        <tr class=\"{}\"><td>{}</td><td>{}</td><td><code>{}</code></td><td>{}</td><td>{} = {}</td></tr>\n",
            row_class,
            html_escape(&probe.test),
            probe.category,
            html_escape(probe.input.value()),
            probe.response_code,
            probe.verdict.label(),
            probe.verdict.holds()
        ));
    }

    html.push_str("    </table>\n</div>\n");
    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
