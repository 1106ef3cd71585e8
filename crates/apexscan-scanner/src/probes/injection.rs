use super::{ProbeCategory, ProbeInput, ProbeResult, ProbeStatus, ProbeSuite, Verdict};
use crate::error::Result;
use apexscan_zap::{Method, RawRequest};

/// An injection payload counts as accepted when the server answers 200.
pub(super) fn verdict(status: ProbeStatus) -> Verdict {
    Verdict::Vulnerable(status == ProbeStatus::Code(200))
}

impl ProbeSuite<'_> {
    /// SQL payloads in the upload body, then NoSQL payloads in the download
    /// path.
    pub async fn injection(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing API security...");
        let mut results = Vec::new();

        for payload in &self.config.sql_payloads {
            let body = self.upload_body(
                format!("test{payload}@example.com"),
                format!("test{payload}.mp4"),
            );
            let request = RawRequest::new(Method::POST, self.upload_url()).json_body(&body);
            let status = self.transport.dispatch(request).await?.status();

            results.push(ProbeResult {
                test: "SQL Injection in Upload API".to_string(),
                category: ProbeCategory::Injection,
                input: ProbeInput::Payload(payload.clone()),
                response_code: status,
                verdict: verdict(status),
            });
        }

        for payload in &self.config.nosql_payloads {
            let request = RawRequest::new(Method::GET, self.download_url(payload));
            let status = self.transport.dispatch(Ok(request)).await?.status();

            results.push(ProbeResult {
                test: "NoSQL Injection in Download API".to_string(),
                category: ProbeCategory::Injection,
                input: ProbeInput::Payload(payload.clone()),
                response_code: status,
                verdict: verdict(status),
            });
        }

        Ok(results)
    }
}
