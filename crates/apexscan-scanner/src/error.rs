use apexscan_core::ConfigError;
use apexscan_zap::EngineError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Stage of a run that a timeout or cancellation is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scope,
    Spider,
    ActiveScan,
    Probes,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope => write!(f, "Scope configuration"),
            Self::Spider => write!(f, "Spider scan"),
            Self::ActiveScan => write!(f, "Active scan"),
            Self::Probes => write!(f, "Targeted probes"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot reach scanning engine: {0}")]
    EngineUnreachable(#[source] EngineError),

    #[error("failed to configure scope context {context}: {source}")]
    ScopeConfiguration {
        context: String,
        #[source]
        source: EngineError,
    },

    #[error("engine returned no id for scope context {context}")]
    EmptyContextId { context: String },

    #[error("{stage} on {target} did not complete within {waited:?}")]
    Timeout {
        stage: Stage,
        target: String,
        waited: Duration,
    },

    #[error("{stage} on {target} was cancelled")]
    Cancelled { stage: Stage, target: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

impl ScanError {
    /// Whether the run failed before any scan was started.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::EngineUnreachable(_)
                | Self::ScopeConfiguration { .. }
                | Self::EmptyContextId { .. }
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failures() {
        let err = ScanError::EmptyContextId {
            context: "ApexShare".to_string(),
        };
        assert!(err.is_setup_failure());

        let err = ScanError::Cancelled {
            stage: Stage::Spider,
            target: "https://apexshare.be".to_string(),
        };
        assert!(!err.is_setup_failure());
        assert_eq!(err.to_string(), "Spider scan on https://apexshare.be was cancelled");

        let err = ScanError::Cancelled {
            stage: Stage::Probes,
            target: "https://api.apexshare.be/upload".to_string(),
        };
        assert!(!err.is_setup_failure());
        assert_eq!(
            err.to_string(),
            "Targeted probes on https://api.apexshare.be/upload was cancelled"
        );
    }
}
