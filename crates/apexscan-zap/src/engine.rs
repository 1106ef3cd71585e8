//! The control surface of the scanning engine.

use crate::error::Result;
use crate::message::{HttpMessage, RawRequest};
use apexscan_core::{Alert, JobId, Progress};
use async_trait::async_trait;

/// Remote-control operations the scan workflow needs from the engine.
///
/// Implementations must be thread-safe (Send + Sync) so a single client can
/// be shared behind an `Arc` by every stage of a run.
#[async_trait]
pub trait ScanEngine: Send + Sync {
    /// Engine version string. Doubles as the connection check.
    async fn version(&self) -> Result<String>;

    /// Create a named scope context and return its id.
    async fn new_context(&self, name: &str) -> Result<String>;

    /// Add an include pattern to a context.
    async fn include_in_context(&self, context_name: &str, pattern: &str) -> Result<()>;

    /// Add an exclude pattern to a context.
    async fn exclude_from_context(&self, context_name: &str, pattern: &str) -> Result<()>;

    /// Register a rule that sets `name: value` on every outgoing request.
    async fn add_header_rule(&self, name: &str, value: &str) -> Result<()>;

    /// Start a spider job.
    async fn start_spider(
        &self,
        url: &str,
        max_children: u32,
        recurse: bool,
        subtree_only: bool,
    ) -> Result<JobId>;

    /// Progress of a spider job.
    async fn spider_progress(&self, job: &JobId) -> Result<Progress>;

    /// URLs discovered by a spider job.
    async fn spider_results(&self, job: &JobId) -> Result<Vec<String>>;

    /// Stop a spider job.
    async fn stop_spider(&self, job: &JobId) -> Result<()>;

    /// Start an active scan job.
    async fn start_active_scan(
        &self,
        url: &str,
        recurse: bool,
        in_scope_only: bool,
        policy_name: &str,
    ) -> Result<JobId>;

    /// Progress of an active scan job.
    async fn active_scan_progress(&self, job: &JobId) -> Result<Progress>;

    /// Stop an active scan job.
    async fn stop_active_scan(&self, job: &JobId) -> Result<()>;

    /// Alerts raised against URLs under `base_url`.
    async fn alerts(&self, base_url: &str) -> Result<Vec<Alert>>;

    /// Submit a raw request and return the transaction the engine recorded
    /// for it.
    async fn send_raw_request(&self, request: &RawRequest) -> Result<HttpMessage>;
}
