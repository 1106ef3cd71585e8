//! Scan orchestrator for the end-to-end assessment.
//!
//! This module provides the `ScanOrchestrator` which drives the stages in a
//! fixed order: connection check, scope configuration, discovery and active
//! scanning of both origins, then the targeted probes and the analysis.

use crate::active::ActiveScanDriver;
use crate::discovery::DiscoveryDriver;
use crate::error::{Result, ScanError, Stage};
use crate::probes::ProbeSuite;
use crate::run::{RunResult, ScanInfo};
use crate::scope::{configure_scope, scope_context};
use apexscan_core::{ScanConfig, ScanTarget};
use apexscan_zap::ScanEngine;
use chrono::Local;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Orchestrates one full scan run against the configured deployment.
pub struct ScanOrchestrator {
    /// Engine every stage talks to
    engine: Arc<dyn ScanEngine>,
    /// Effective configuration
    config: ScanConfig,
    /// Stops the run between stages, during waits and between probes
    cancel: CancellationToken,
}

impl ScanOrchestrator {
    /// Create a new orchestrator.
    #[must_use]
    pub fn new(engine: Arc<dyn ScanEngine>, config: ScanConfig) -> Self {
        Self {
            engine,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` to interrupt the run.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that interrupts this orchestrator's run.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Check that the engine answers and return its version.
    pub async fn check_connection(&self) -> Result<String> {
        match self.engine.version().await {
            Ok(version) => {
                tracing::info!("✓ Connected to OWASP ZAP version: {version}");
                Ok(version)
            }
            Err(e) => {
                tracing::error!("✗ Error connecting to ZAP: {e}");
                tracing::error!(
                    "Please ensure OWASP ZAP is running on {}",
                    self.config.engine.api_url
                );
                Err(ScanError::EngineUnreachable(e))
            }
        }
    }

    /// Run every stage and return the populated result.
    ///
    /// Setup failures (engine unreachable, scope rejected) abort before any
    /// scan is started. A later stage failing aborts the remaining stages.
    /// Cancellation is honoured before every stage and inside the waits and
    /// the probe suite.
    pub async fn run(&self) -> Result<RunResult> {
        tracing::info!("Starting comprehensive ApexShare security assessment...");

        let target = self.config.target()?;
        let api = self.config.api()?;
        let start_time = Local::now();

        let zap_version = self.check_connection().await?;

        self.ensure_running(Stage::Scope, &target)?;
        let context = scope_context(&self.config.scope, &[&target, &api]);
        let context_id =
            configure_scope(self.engine.as_ref(), &context, &self.config.scope.header_rules)
                .await?;

        let mut result = RunResult::new(ScanInfo {
            target_url: target.to_string(),
            api_url: api.to_string(),
            start_time,
            end_time: None,
            zap_version,
            context_id,
        });

        let discovery =
            DiscoveryDriver::new(self.engine.as_ref(), &self.config.spider, &self.cancel);
        for origin in [&target, &api] {
            self.ensure_running(Stage::Spider, origin)?;
            result.spider_results.push(discovery.run(origin).await?);
        }

        let active =
            ActiveScanDriver::new(self.engine.as_ref(), &self.config.active_scan, &self.cancel);
        for origin in [&target, &api] {
            self.ensure_running(Stage::ActiveScan, origin)?;
            result.active_scan_results.push(active.run(origin).await?);
        }

        let suite =
            ProbeSuite::new(self.engine.as_ref(), &self.config.probes, &api, &self.cancel);
        result.specific_tests = suite.run_all().await?;

        result.analyze();
        result.finish();

        tracing::info!(
            total = result.vulnerability_summary.total_vulnerabilities,
            high = result.vulnerability_summary.high_risk,
            medium = result.vulnerability_summary.medium_risk,
            "Scan run finished"
        );
        Ok(result)
    }

    fn ensure_running(&self, stage: Stage, target: &ScanTarget) -> Result<()> {
        if self.cancel.is_cancelled() {
            tracing::warn!("Run cancelled before {stage} on {target}");
            return Err(ScanError::Cancelled {
                stage,
                target: target.to_string(),
            });
        }
        Ok(())
    }
}
