//! Active scan stage.

use crate::error::{Result, ScanError, Stage};
use crate::poll::{wait_for_completion, PollSettings};
use apexscan_core::{ActiveScanConfig, Alert, JobId, ScanTarget};
use apexscan_zap::ScanEngine;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Alerts raised against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveScanOutcome {
    /// Target that was attacked
    pub target: String,
    /// Engine job id
    pub scan_id: JobId,
    /// Number of alerts for the target's base URL
    pub alerts_count: usize,
    /// Alerts as returned by the engine
    pub alerts: Vec<Alert>,
}

/// Runs an active scan to completion and collects the alerts for its target.
pub struct ActiveScanDriver<'a> {
    engine: &'a dyn ScanEngine,
    config: &'a ActiveScanConfig,
    cancel: &'a CancellationToken,
}

impl<'a> ActiveScanDriver<'a> {
    /// Create a driver over `engine`.
    #[must_use]
    pub fn new(
        engine: &'a dyn ScanEngine,
        config: &'a ActiveScanConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            engine,
            config,
            cancel,
        }
    }

    /// Attack `target` with the configured policy and wait for the scan to
    /// finish.
    pub async fn run(&self, target: &ScanTarget) -> Result<ActiveScanOutcome> {
        tracing::info!("Starting active scan on: {target}");

        let job = self
            .engine
            .start_active_scan(
                target.as_str(),
                self.config.recurse,
                self.config.in_scope_only,
                &self.config.policy_name,
            )
            .await?;
        tracing::info!("Active scan started with ID: {job}");

        let settings =
            PollSettings::new(self.config.poll_interval()).with_deadline(self.config.timeout());
        let waited = wait_for_completion(
            Stage::ActiveScan,
            target.as_str(),
            &settings,
            self.cancel,
            || self.engine.active_scan_progress(&job),
        )
        .await;

        if let Err(err) = waited {
            if matches!(err, ScanError::Timeout { .. } | ScanError::Cancelled { .. }) {
                if let Err(stop_err) = self.engine.stop_active_scan(&job).await {
                    tracing::warn!(job = %job, "failed to stop active scan: {stop_err}");
                }
            }
            return Err(err);
        }
        tracing::info!("✓ Active scan completed");

        let alerts = self.engine.alerts(target.as_str()).await?;
        tracing::info!(url = %target, "{} alerts raised", alerts.len());

        Ok(ActiveScanOutcome {
            target: target.to_string(),
            scan_id: job,
            alerts_count: alerts.len(),
            alerts,
        })
    }
}
