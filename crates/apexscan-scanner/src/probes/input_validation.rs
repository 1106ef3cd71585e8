use super::{ProbeCategory, ProbeInput, ProbeResult, ProbeSuite, Verdict};
use crate::error::Result;
use apexscan_zap::{Method, RawRequest};

impl ProbeSuite<'_> {
    /// Script payloads in every free-text field of the upload body.
    pub async fn input_validation(&self) -> Result<Vec<ProbeResult>> {
        tracing::info!("Testing input validation...");
        let mut results = Vec::new();

        for payload in &self.config.xss_payloads {
            let mut body =
                self.upload_body("test@example.com".to_string(), "test.mp4".to_string());
            body.student_name = Some(payload.as_str());
            body.trainer_name = Some(payload.as_str());
            body.notes = Some(payload.as_str());

            let request = RawRequest::new(Method::POST, self.upload_url()).json_body(&body);
            let status = self.transport.dispatch(request).await?.status();

            results.push(ProbeResult {
                test: "XSS Input Validation".to_string(),
                category: ProbeCategory::InputValidation,
                input: ProbeInput::Payload(payload.clone()),
                response_code: status,
                verdict: Verdict::ProperlySanitized(self.is_rejection(status)),
            });
        }

        Ok(results)
    }
}
