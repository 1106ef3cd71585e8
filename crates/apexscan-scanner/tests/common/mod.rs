//! Scripted in-memory engine shared by the scanner integration tests.

#![allow(dead_code)]

use apexscan_core::{Alert, JobId, Progress};
use apexscan_zap::{EngineError, HttpMessage, RawRequest, ScanEngine};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&RawRequest) -> Result<HttpMessage, EngineError> + Send + Sync>;

/// Engine fake with scripted progress, per-target alerts and a probe
/// responder. Every call is logged by operation name.
pub struct FakeEngine {
    pub version_error: bool,
    pub context_id: String,
    /// Fail `include_in_context` for this pattern
    pub rejected_include: Option<String>,
    pub spider_steps: Mutex<VecDeque<u32>>,
    pub active_steps: Mutex<VecDeque<u32>>,
    pub spider_urls: Vec<String>,
    pub alerts: HashMap<String, Vec<Alert>>,
    pub responder: Responder,
    pub calls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<RawRequest>>,
    pub next_job: AtomicU32,
}

impl Default for FakeEngine {
    fn default() -> Self {
        Self {
            version_error: false,
            context_id: "1".to_string(),
            rejected_include: None,
            spider_steps: Mutex::new(VecDeque::new()),
            active_steps: Mutex::new(VecDeque::new()),
            spider_urls: vec!["https://apexshare.be/".to_string()],
            alerts: HashMap::new(),
            responder: Box::new(|_| Ok(message(404, &[]))),
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_job: AtomicU32::new(0),
        }
    }
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spider_steps(self, steps: &[u32]) -> Self {
        *self.spider_steps.lock().unwrap() = steps.iter().copied().collect();
        self
    }

    pub fn with_active_steps(self, steps: &[u32]) -> Self {
        *self.active_steps.lock().unwrap() = steps.iter().copied().collect();
        self
    }

    pub fn with_alerts(mut self, base_url: &str, alerts: Vec<Alert>) -> Self {
        self.alerts.insert(base_url.to_string(), alerts);
        self
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&RawRequest) -> Result<HttpMessage, EngineError> + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_named(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(name)).count()
    }

    pub fn requests(&self) -> Vec<RawRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn job(&self) -> JobId {
        JobId::new(self.next_job.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

/// A recorded transaction with the given status and response headers.
pub fn message(status: u16, headers: &[(&str, &str)]) -> HttpMessage {
    let mut response_header = format!("HTTP/1.1 {status} Status\r\n");
    for (name, value) in headers {
        response_header.push_str(&format!("{name}: {value}\r\n"));
    }
    response_header.push_str("\r\n");

    HttpMessage {
        id: "1".to_string(),
        response_header,
        ..HttpMessage::default()
    }
}

fn next_step(steps: &Mutex<VecDeque<u32>>) -> Progress {
    Progress::new(steps.lock().unwrap().pop_front().unwrap_or(100))
}

#[async_trait]
impl ScanEngine for FakeEngine {
    async fn version(&self) -> apexscan_zap::Result<String> {
        self.log("version");
        if self.version_error {
            return Err(EngineError::InvalidRequest("engine down".to_string()));
        }
        Ok("2.15.0".to_string())
    }

    async fn new_context(&self, name: &str) -> apexscan_zap::Result<String> {
        self.log(format!("new_context {name}"));
        Ok(self.context_id.clone())
    }

    async fn include_in_context(&self, _context: &str, pattern: &str) -> apexscan_zap::Result<()> {
        self.log(format!("include {pattern}"));
        if self.rejected_include.as_deref() == Some(pattern) {
            return Err(EngineError::Api {
                operation: "context/action/includeInContext".to_string(),
                status: 400,
                message: format!("illegal regex: {pattern}"),
            });
        }
        Ok(())
    }

    async fn exclude_from_context(
        &self,
        _context: &str,
        pattern: &str,
    ) -> apexscan_zap::Result<()> {
        self.log(format!("exclude {pattern}"));
        Ok(())
    }

    async fn add_header_rule(&self, name: &str, _value: &str) -> apexscan_zap::Result<()> {
        self.log(format!("header {name}"));
        Ok(())
    }

    async fn start_spider(
        &self,
        url: &str,
        _max_children: u32,
        _recurse: bool,
        _subtree_only: bool,
    ) -> apexscan_zap::Result<JobId> {
        self.log(format!("start_spider {url}"));
        Ok(self.job())
    }

    async fn spider_progress(&self, _job: &JobId) -> apexscan_zap::Result<Progress> {
        self.log("spider_progress");
        Ok(next_step(&self.spider_steps))
    }

    async fn spider_results(&self, _job: &JobId) -> apexscan_zap::Result<Vec<String>> {
        self.log("spider_results");
        Ok(self.spider_urls.clone())
    }

    async fn stop_spider(&self, job: &JobId) -> apexscan_zap::Result<()> {
        self.log(format!("stop_spider {job}"));
        Ok(())
    }

    async fn start_active_scan(
        &self,
        url: &str,
        _recurse: bool,
        _in_scope_only: bool,
        _policy_name: &str,
    ) -> apexscan_zap::Result<JobId> {
        self.log(format!("start_active_scan {url}"));
        Ok(self.job())
    }

    async fn active_scan_progress(&self, _job: &JobId) -> apexscan_zap::Result<Progress> {
        self.log("active_scan_progress");
        Ok(next_step(&self.active_steps))
    }

    async fn stop_active_scan(&self, job: &JobId) -> apexscan_zap::Result<()> {
        self.log(format!("stop_active_scan {job}"));
        Ok(())
    }

    async fn alerts(&self, base_url: &str) -> apexscan_zap::Result<Vec<Alert>> {
        self.log(format!("alerts {base_url}"));
        Ok(self.alerts.get(base_url).cloned().unwrap_or_default())
    }

    async fn send_raw_request(&self, request: &RawRequest) -> apexscan_zap::Result<HttpMessage> {
        self.log(format!("send {} {}", request.method(), request.url()));
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}
