use super::{
    ProbeCategory, ProbeInput, ProbeResult, ProbeSuite, Verdict, DEFAULT_CONTENT_TYPE,
    DEFAULT_FILE_SIZE,
};
use crate::error::Result;
use apexscan_zap::{Method, RawRequest};

impl ProbeSuite<'_> {
    /// Crafted upload descriptors that a well-behaved API refuses.
    pub async fn upload(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing file upload security...");
        let mut results = Vec::new();

        for case in &self.config.malicious_uploads {
            let mut body = self.upload_body(
                "security-test@example.com".to_string(),
                case.name.clone(),
            );
            body.file_size = case.size.unwrap_or(DEFAULT_FILE_SIZE);
            body.content_type = case.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

            let request = RawRequest::new(Method::POST, self.upload_url()).json_body(&body);
            let status = self.transport.dispatch(request).await?.status();

            results.push(ProbeResult {
                test: format!("Malicious File Upload - {}", case.name),
                category: ProbeCategory::Upload,
                input: ProbeInput::FileType(
                    case.content_type
                        .clone()
                        .unwrap_or_else(|| "unknown".to_string()),
                ),
                response_code: status,
                verdict: Verdict::Rejected(self.is_rejection(status)),
            });
        }

        Ok(results)
    }
}
