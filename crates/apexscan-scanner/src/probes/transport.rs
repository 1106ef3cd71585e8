//! Probe delivery through the engine.

use super::ProbeStatus;
use crate::error::{Result, ScanError, Stage};
use apexscan_zap::{RawRequest, ScanEngine};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// What came back for a probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The engine recorded a response.
    Responded {
        /// Response status code
        status: u16,
        /// Response headers keyed by lower-cased name
        headers: BTreeMap<String, String>,
        /// Response body
        body: String,
    },
    /// The request could not be composed, sent, or read back.
    TransportFailed {
        /// Why delivery failed
        reason: String,
    },
}

impl ProbeOutcome {
    /// Observed status, `ERROR` for transport failures.
    #[must_use]
    pub fn status(&self) -> ProbeStatus {
        match self {
            Self::Responded { status, .. } => ProbeStatus::Code(*status),
            Self::TransportFailed { .. } => ProbeStatus::Error,
        }
    }

    /// Whether the response carries header `name` (lower-case).
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        match self {
            Self::Responded { headers, .. } => headers.contains_key(name),
            Self::TransportFailed { .. } => false,
        }
    }
}

/// Sends probe requests and folds every failure into a [`ProbeOutcome`].
pub struct ProbeTransport<'a> {
    engine: &'a dyn ScanEngine,
    cancel: &'a CancellationToken,
}

impl<'a> ProbeTransport<'a> {
    /// Create a transport over `engine`.
    #[must_use]
    pub fn new(engine: &'a dyn ScanEngine, cancel: &'a CancellationToken) -> Self {
        Self { engine, cancel }
    }

    /// Submit a probe request.
    ///
    /// `request` is accepted as a `Result` so that failures while composing
    /// the request are reported the same way as failures on the wire.
    /// Only cancellation is an error: nothing is sent once the token fires.
    pub async fn dispatch(
        &self,
        request: apexscan_zap::Result<RawRequest>,
    ) -> Result<ProbeOutcome> {
        let request = match request {
            Ok(request) => request,
            Err(e) => return Ok(failed("<unbuilt request>", &e.to_string())),
        };

        let cancelled = || ScanError::Cancelled {
            stage: Stage::Probes,
            target: request.url().to_string(),
        };
        if self.cancel.is_cancelled() {
            return Err(cancelled());
        }

        let sent = tokio::select! {
            sent = self.engine.send_raw_request(&request) => sent,
            () = self.cancel.cancelled() => return Err(cancelled()),
        };
        let message = match sent {
            Ok(message) => message,
            Err(e) => return Ok(failed(request.url(), &e.to_string())),
        };

        Ok(match message.status_code() {
            Some(status) => {
                tracing::debug!(
                    method = %request.method(),
                    url = request.url(),
                    status,
                    "probe answered"
                );
                ProbeOutcome::Responded {
                    status,
                    headers: message.response_headers(),
                    body: message.response_body,
                }
            }
            None => failed(request.url(), "recorded transaction has no status line"),
        })
    }
}

fn failed(url: &str, reason: &str) -> ProbeOutcome {
    tracing::warn!("Error testing endpoint {url}: {reason}");
    ProbeOutcome::TransportFailed {
        reason: reason.to_string(),
    }
}
