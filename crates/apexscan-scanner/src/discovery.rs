//! Spider (discovery) stage.

use crate::error::{Result, ScanError, Stage};
use crate::poll::{wait_for_completion, PollSettings};
use apexscan_core::{JobId, ScanTarget, SpiderConfig};
use apexscan_zap::ScanEngine;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// URLs discovered on one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOutcome {
    /// Target that was crawled
    pub target: String,
    /// Engine job id
    pub scan_id: JobId,
    /// Number of URLs found
    pub urls_found: usize,
    /// URLs found, in engine order
    pub urls: Vec<String>,
}

/// Runs a spider job to completion and collects its results.
pub struct DiscoveryDriver<'a> {
    engine: &'a dyn ScanEngine,
    config: &'a SpiderConfig,
    cancel: &'a CancellationToken,
}

impl<'a> DiscoveryDriver<'a> {
    /// Create a driver over `engine`.
    #[must_use]
    pub fn new(
        engine: &'a dyn ScanEngine,
        config: &'a SpiderConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            engine,
            config,
            cancel,
        }
    }

    /// Crawl `target` and wait for the spider to finish.
    ///
    /// If the wait times out or is cancelled, the remote job is stopped
    /// before the error is returned.
    pub async fn run(&self, target: &ScanTarget) -> Result<DiscoveryOutcome> {
        tracing::info!("Starting spider scan on: {target}");

        let job = self
            .engine
            .start_spider(
                target.as_str(),
                self.config.max_children,
                self.config.recurse,
                self.config.subtree_only,
            )
            .await?;
        tracing::info!("Spider scan started with ID: {job}");

        let settings =
            PollSettings::new(self.config.poll_interval()).with_deadline(self.config.timeout());
        let waited = wait_for_completion(
            Stage::Spider,
            target.as_str(),
            &settings,
            self.cancel,
            || self.engine.spider_progress(&job),
        )
        .await;

        if let Err(err) = waited {
            if matches!(err, ScanError::Timeout { .. } | ScanError::Cancelled { .. }) {
                if let Err(stop_err) = self.engine.stop_spider(&job).await {
                    tracing::warn!(job = %job, "failed to stop spider: {stop_err}");
                }
            }
            return Err(err);
        }
        tracing::info!("✓ Spider scan completed");

        let urls = self.engine.spider_results(&job).await?;
        tracing::info!("Spider found {} URLs", urls.len());

        Ok(DiscoveryOutcome {
            target: target.to_string(),
            scan_id: job,
            urls_found: urls.len(),
            urls,
        })
    }
}
