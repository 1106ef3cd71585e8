use super::{ProbeCategory, ProbeInput, ProbeResult, ProbeSuite, Verdict};
use crate::error::Result;
use apexscan_zap::{Method, RawRequest};

impl ProbeSuite<'_> {
    /// Unauthenticated downloads of guessed and traversal identifiers.
    pub async fn authorization(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing authentication/authorization security...");
        let mut results = Vec::new();

        for id in &self.config.file_ids {
            let request = RawRequest::new(Method::GET, self.download_url(id));
            let status = self.transport.dispatch(Ok(request)).await?.status();
            let protected = status
                .code()
                .is_some_and(|code| self.config.protected_statuses.contains(&code));

            results.push(ProbeResult {
                test: format!("Unauthorized Access Test - {id}"),
                category: ProbeCategory::Authorization,
                input: ProbeInput::FileId(id.clone()),
                response_code: status,
                verdict: Verdict::ProperlyProtected(protected),
            });
        }

        Ok(results)
    }
}
