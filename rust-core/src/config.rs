//! Monitor configuration.
//!
//! Bundles the sub-component configurations into one package that can be
//! loaded from a TOML file:
//!
//! ```toml
//! sensor_buffer = 64
//!
//! [sampler]
//! gravity_mps2 = 9.8
//! stillness_threshold_mps2 = 0.1
//!
//! [ticker]
//! interval_ms = 1000
//!
//! [[alert_stages]]
//! threshold_secs = 2
//! message = "Movement detected"
//! color_tag = "green"
//! ```
//!
//! Every field is optional; omitted fields keep their defaults.

use std::path::Path;

use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::alert::validate_stages;
use crate::error::ConfigError;
use crate::sampler::SamplerConfig;
use crate::ticker::TickerConfig;
use crate::types::{default_alert_stages, AlertStage};

/// Configuration for a `StillnessMonitor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Movement detection parameters.
    pub sampler: SamplerConfig,

    /// Duration publish cadence.
    pub ticker: TickerConfig,

    /// Staged alert table, ascending by threshold.
    pub alert_stages: Vec<AlertStage>,

    /// Capacity of the motion event bus. Slow listeners drop the oldest
    /// events beyond this.
    pub sensor_buffer: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            ticker: TickerConfig::default(),
            alert_stages: default_alert_stages(),
            sensor_buffer: 64,
        }
    }
}

impl MonitorConfig {
    /// Reads, parses and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: MonitorConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and the alert table ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.sampler.stillness_threshold_mps2;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "sampler.stillness_threshold_mps2",
                reason: format!("must be a finite non-negative number, got {threshold}"),
            });
        }

        if !self.sampler.gravity_mps2.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "sampler.gravity_mps2",
                reason: "must be finite".to_string(),
            });
        }

        if self.ticker.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ticker.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.sensor_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sensor_buffer",
                reason: "must be greater than zero".to_string(),
            });
        }

        validate_stages(&self.alert_stages)
    }
}
