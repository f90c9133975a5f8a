//! Error types for the stillness monitor.
//!
//! Malformed motion samples are not errors: the sampler reports them as
//! `SampleOutcome::Ignored`. Only permission and configuration failures
//! surface here.

use std::path::PathBuf;

use crate::types::PermissionStatus;

/// Errors surfaced by the monitor lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The platform answered the permission request with something other
    /// than a grant. The session stays stopped.
    #[error("motion sensor permission not granted ({status:?})")]
    PermissionDenied { status: PermissionStatus },

    /// The permission request mechanism itself failed. Treated like a
    /// denial.
    #[error("motion permission request failed: {0}")]
    PermissionRequestFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MonitorError {
    /// True for both permission failure modes.
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            MonitorError::PermissionDenied { .. } | MonitorError::PermissionRequestFailed(_)
        )
    }
}

/// Errors from loading or validating a `MonitorConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("alert stage table is empty")]
    EmptyStages,

    #[error("alert stages must ascend by threshold: stage {index} ({threshold_secs}s) follows {previous_secs}s")]
    UnsortedStages {
        index: usize,
        threshold_secs: u64,
        previous_secs: u64,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
