use super::{ProbeCategory, ProbeInput, ProbeOutcome, ProbeResult, ProbeSuite, Verdict};
use crate::error::Result;
use apexscan_zap::{Method, RawRequest};

const ALLOW_ORIGIN: &str = "access-control-allow-origin";

/// Any `Access-Control-Allow-Origin` on the preflight counts, whatever the
/// status code.
pub(super) fn verdict(outcome: &ProbeOutcome) -> Verdict {
    Verdict::AllowsOrigin(outcome.has_header(ALLOW_ORIGIN))
}

impl ProbeSuite<'_> {
    /// Preflight requests from foreign origins.
    pub async fn cors(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing CORS security...");
        let mut results = Vec::new();

        for origin in &self.config.cors_origins {
            let request = RawRequest::new(Method::OPTIONS, self.upload_url())
                .header("Origin", origin.as_str())
                .header("Access-Control-Request-Method", "POST")
                .header("Access-Control-Request-Headers", "Content-Type");
            let outcome = self.transport.dispatch(Ok(request)).await?;

            results.push(ProbeResult {
                test: format!("CORS Origin Test - {origin}"),
                category: ProbeCategory::Cors,
                input: ProbeInput::Origin(origin.clone()),
                response_code: outcome.status(),
                verdict: verdict(&outcome),
            });
        }

        Ok(results)
    }
}
