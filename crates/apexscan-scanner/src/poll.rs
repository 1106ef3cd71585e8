//! Fixed-interval polling of engine jobs.
//!
//! A wait ends when the job reports 100%, when the optional deadline passes,
//! or when the cancellation token fires. Without a deadline the wait is
//! unbounded, matching how the engine itself treats long scans.

use crate::error::{Result, ScanError, Stage};
use apexscan_core::Progress;
use apexscan_zap::EngineError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How often to poll and how long to keep trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between progress checks
    pub interval: Duration,
    /// Give up after this long (unbounded when `None`)
    pub deadline: Option<Duration>,
}

impl PollSettings {
    /// Poll every `interval`, forever.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Set or clear the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Poll `check` until it reports completion.
///
/// The first check happens immediately; later checks are spaced by
/// `settings.interval`, except that the last one lands on the deadline.
/// Engine errors end the wait and are returned as-is.
pub async fn wait_for_completion<F, Fut>(
    stage: Stage,
    target: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<Progress, EngineError>>,
{
    let started = Instant::now();

    loop {
        let progress = check().await?;
        if progress.is_complete() {
            return Ok(());
        }

        tracing::info!(
            stage = %stage,
            url = target,
            progress = %progress,
            "{stage} progress: {progress}"
        );

        let mut pause = settings.interval;
        if let Some(deadline) = settings.deadline {
            let waited = started.elapsed();
            if waited >= deadline {
                return Err(ScanError::Timeout {
                    stage,
                    target: target.to_string(),
                    waited,
                });
            }
            // Never sleep past the deadline
            pause = pause.min(deadline - waited);
        }

        tokio::select! {
            () = tokio::time::sleep(pause) => {}
            () = cancel.cancelled() => {
                return Err(ScanError::Cancelled {
                    stage,
                    target: target.to_string(),
                });
            }
        }
    }
}
