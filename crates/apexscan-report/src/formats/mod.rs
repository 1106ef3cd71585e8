//! Report renderers, one per output document.

pub mod html;
pub mod json;
pub mod text;

#[cfg(test)]
pub(crate) mod tests {
    use apexscan_core::{Alert, JobId};
    use apexscan_scanner::{
        ActiveScanOutcome, DiscoveryOutcome, ProbeCategory, ProbeInput, ProbeResult, ProbeStatus,
        RunResult, ScanInfo, Verdict,
    };
    use chrono::{Local, TimeZone};

    /// A small but complete run: one alert per severity of interest, one
    /// probe of each kind of status.
    pub(crate) fn sample_result() -> RunResult {
        let start = Local
            .with_ymd_and_hms(2025, 1, 20, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        let end = Local
            .with_ymd_and_hms(2025, 1, 20, 10, 42, 0)
            .single()
            .expect("valid timestamp");

        let mut result = RunResult::new(ScanInfo {
            target_url: "https://apexshare.be".to_string(),
            api_url: "https://api.apexshare.be".to_string(),
            start_time: start,
            end_time: Some(end),
            zap_version: "2.15.0".to_string(),
            context_id: "1".to_string(),
        });

        result.spider_results.push(DiscoveryOutcome {
            target: "https://apexshare.be".to_string(),
            scan_id: JobId::new("0"),
            urls_found: 2,
            urls: vec![
                "https://apexshare.be/".to_string(),
                "https://apexshare.be/upload".to_string(),
            ],
        });

        let alerts = vec![
            Alert::new(
                "SQL Injection",
                "High",
                "SQL injection may be possible.",
                "https://api.apexshare.be/upload",
            ),
            Alert::new(
                "Cross Site Scripting (Reflected)",
                "Medium",
                "<script>alert(1)</script> was reflected",
                "https://apexshare.be/search?q=<x>",
            ),
        ];
        result.active_scan_results.push(ActiveScanOutcome {
            target: "https://api.apexshare.be".to_string(),
            scan_id: JobId::new("1"),
            alerts_count: alerts.len(),
            alerts,
        });

        result.specific_tests = vec![
            ProbeResult {
                test: "Unauthorized Access Test - admin".to_string(),
                category: ProbeCategory::Authorization,
                input: ProbeInput::FileId("admin".to_string()),
                response_code: ProbeStatus::Code(404),
                verdict: Verdict::ProperlyProtected(true),
            },
            ProbeResult {
                test: "CORS Origin Test - *".to_string(),
                category: ProbeCategory::Cors,
                input: ProbeInput::Origin("*".to_string()),
                response_code: ProbeStatus::Code(204),
                verdict: Verdict::AllowsOrigin(true),
            },
            ProbeResult {
                test: "XSS Input Validation".to_string(),
                category: ProbeCategory::InputValidation,
                input: ProbeInput::Payload(r#"<script>alert("XSS")</script>"#.to_string()),
                response_code: ProbeStatus::Error,
                verdict: Verdict::ProperlySanitized(false),
            },
        ];

        result.analyze();
        result
    }
}
