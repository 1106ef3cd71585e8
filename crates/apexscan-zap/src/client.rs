//! OWASP ZAP implementation of [`ScanEngine`] over its JSON API.
//!
//! Every operation maps onto `{base}/JSON/{component}/{view|action}/{name}/`.
//! Views are issued as GET with query parameters, actions as form POSTs.

use crate::engine::ScanEngine;
use crate::error::{EngineError, Result};
use crate::message::{HttpMessage, RawRequest};
use apexscan_core::{Alert, EngineConfig, JobId, Progress};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "X-ZAP-API-Key";

/// Client for a running ZAP instance.
pub struct ZapClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ZapClient {
    /// Create a client for ZAP on `localhost:8080`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Create a client for ZAP at a custom base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_url(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client from the engine section of the scan configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::build(
            config.api_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Send `key` with every call.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Base URL of the control API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn view<T: DeserializeOwned>(
        &self,
        component: &str,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.call(Method::GET, component, "view", operation, params).await
    }

    async fn action<T: DeserializeOwned>(
        &self,
        component: &str,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.call(Method::POST, component, "action", operation, params).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        component: &str,
        kind: &str,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let op = format!("{component}/{kind}/{operation}");
        let url = format!("{}/JSON/{op}/", self.base_url);

        let mut request = if method == Method::GET {
            self.client.get(&url).query(params)
        } else {
            self.client.post(&url).form(params)
        };
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        tracing::trace!(operation = %op, "engine call");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(EngineError::Api {
                operation: op,
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| EngineError::parse(&op, e.to_string()))
    }

    async fn expect_ok(
        &self,
        component: &str,
        operation: &str,
        params: &[(&str, &str)],
    ) -> Result<()> {
        let response: ActionResponse = self.action(component, operation, params).await?;
        if response.result == "OK" {
            Ok(())
        } else {
            Err(EngineError::parse(
                &format!("{component}/action/{operation}"),
                format!("unexpected result '{}'", response.result),
            ))
        }
    }

    fn parse_progress(operation: &str, status: &str) -> Result<Progress> {
        status
            .parse()
            .map_err(|e: apexscan_core::ApexError| EngineError::parse(operation, e.to_string()))
    }
}

#[async_trait]
impl ScanEngine for ZapClient {
    async fn version(&self) -> Result<String> {
        let response: VersionResponse = self.view("core", "version", &[]).await?;
        Ok(response.version)
    }

    async fn new_context(&self, name: &str) -> Result<String> {
        let response: NewContextResponse = self
            .action("context", "newContext", &[("contextName", name)])
            .await?;
        Ok(response.context_id)
    }

    async fn include_in_context(&self, context_name: &str, pattern: &str) -> Result<()> {
        self.expect_ok(
            "context",
            "includeInContext",
            &[("contextName", context_name), ("regex", pattern)],
        )
        .await
    }

    async fn exclude_from_context(&self, context_name: &str, pattern: &str) -> Result<()> {
        self.expect_ok(
            "context",
            "excludeFromContext",
            &[("contextName", context_name), ("regex", pattern)],
        )
        .await
    }

    async fn add_header_rule(&self, name: &str, value: &str) -> Result<()> {
        let description = format!("Add {name} header");
        self.expect_ok(
            "replacer",
            "addRule",
            &[
                ("description", description.as_str()),
                ("enabled", "true"),
                ("matchType", "REQ_HEADER"),
                ("matchRegex", "false"),
                ("matchString", name),
                ("replacement", value),
            ],
        )
        .await
    }

    async fn start_spider(
        &self,
        url: &str,
        max_children: u32,
        recurse: bool,
        subtree_only: bool,
    ) -> Result<JobId> {
        let max_children = max_children.to_string();
        let response: ScanResponse = self
            .action(
                "spider",
                "scan",
                &[
                    ("url", url),
                    ("maxChildren", max_children.as_str()),
                    ("recurse", bool_param(recurse)),
                    ("subtreeOnly", bool_param(subtree_only)),
                ],
            )
            .await?;
        Ok(JobId::new(response.scan))
    }

    async fn spider_progress(&self, job: &JobId) -> Result<Progress> {
        let response: StatusResponse = self
            .view("spider", "status", &[("scanId", job.as_str())])
            .await?;
        Self::parse_progress("spider/view/status", &response.status)
    }

    async fn spider_results(&self, job: &JobId) -> Result<Vec<String>> {
        let response: ResultsResponse = self
            .view("spider", "results", &[("scanId", job.as_str())])
            .await?;
        Ok(response.results)
    }

    async fn stop_spider(&self, job: &JobId) -> Result<()> {
        self.expect_ok("spider", "stop", &[("scanId", job.as_str())]).await
    }

    async fn start_active_scan(
        &self,
        url: &str,
        recurse: bool,
        in_scope_only: bool,
        policy_name: &str,
    ) -> Result<JobId> {
        let response: ScanResponse = self
            .action(
                "ascan",
                "scan",
                &[
                    ("url", url),
                    ("recurse", bool_param(recurse)),
                    ("inScopeOnly", bool_param(in_scope_only)),
                    ("scanPolicyName", policy_name),
                ],
            )
            .await?;
        Ok(JobId::new(response.scan))
    }

    async fn active_scan_progress(&self, job: &JobId) -> Result<Progress> {
        let response: StatusResponse = self
            .view("ascan", "status", &[("scanId", job.as_str())])
            .await?;
        Self::parse_progress("ascan/view/status", &response.status)
    }

    async fn stop_active_scan(&self, job: &JobId) -> Result<()> {
        self.expect_ok("ascan", "stop", &[("scanId", job.as_str())]).await
    }

    async fn alerts(&self, base_url: &str) -> Result<Vec<Alert>> {
        let response: AlertsResponse = self
            .view("core", "alerts", &[("baseurl", base_url)])
            .await?;
        Ok(response.alerts)
    }

    async fn send_raw_request(&self, request: &RawRequest) -> Result<HttpMessage> {
        let wire = request.to_wire()?;
        let response: SendRequestResponse = self
            .action(
                "core",
                "sendRequest",
                &[("request", wire.as_str()), ("followRedirects", "false")],
            )
            .await?;

        if let Some(message) = response.messages.into_iter().last() {
            return Ok(message);
        }

        // Older engines answer with an empty list; read the history instead.
        let origin = request.origin()?;
        let history: MessagesResponse = self
            .view("core", "messages", &[("baseurl", origin.as_str())])
            .await?;
        history.messages.into_iter().last().ok_or_else(|| {
            EngineError::parse(
                "core/view/messages",
                format!("no transaction recorded for {}", request.url()),
            )
        })
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

// ZAP API types

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(rename = "Result")]
    result: String,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

#[derive(Debug, Deserialize)]
struct NewContextResponse {
    #[serde(rename = "contextId")]
    context_id: String,
}

#[derive(Debug, Deserialize)]
struct ScanResponse {
    scan: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    results: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    alerts: Vec<Alert>,
}

#[derive(Debug, Deserialize)]
struct SendRequestResponse {
    #[serde(rename = "sendRequest", default)]
    messages: Vec<HttpMessage>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    messages: Vec<HttpMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ZapClient::new().expect("create client");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_client_from_config() {
        let config = EngineConfig {
            api_url: "http://zap.internal:8090/".to_string(),
            api_key: Some("secret".to_string()),
            request_timeout_secs: 5,
        };
        let client = ZapClient::from_config(&config).expect("create client");
        assert_eq!(client.base_url(), "http://zap.internal:8090");
        assert_eq!(client.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_progress_parsing() {
        let progress = ZapClient::parse_progress("spider/view/status", "55").expect("parse");
        assert_eq!(progress.percent(), 55);
        assert!(matches!(
            ZapClient::parse_progress("spider/view/status", "does-not-exist"),
            Err(EngineError::Parse { .. })
        ));
    }

    #[test]
    fn test_bool_param() {
        assert_eq!(bool_param(true), "true");
        assert_eq!(bool_param(false), "false");
    }
}
