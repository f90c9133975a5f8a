//! Alert stage resolution.
//!
//! Maps a stillness duration onto the staged alert table using a
//! "highest qualifying threshold" policy: the last stage whose threshold has
//! been reached wins. When nothing qualifies, the first stage is the
//! default.

use tracing::debug;

use crate::error::ConfigError;
use crate::types::{default_alert_stages, AlertStage};

/// Checks that a stage table is usable: non-empty and non-decreasing by
/// threshold. Equal thresholds are allowed.
pub fn validate_stages(stages: &[AlertStage]) -> Result<(), ConfigError> {
    if stages.is_empty() {
        return Err(ConfigError::EmptyStages);
    }

    for (index, pair) in stages.windows(2).enumerate() {
        if pair[1].threshold_secs < pair[0].threshold_secs {
            return Err(ConfigError::UnsortedStages {
                index: index + 1,
                threshold_secs: pair[1].threshold_secs,
                previous_secs: pair[0].threshold_secs,
            });
        }
    }

    Ok(())
}

/// Index of the stage selected for `duration_secs`.
///
/// Scans from the end so that among equal thresholds the later-declared
/// stage is chosen.
pub fn resolve_index(stages: &[AlertStage], duration_secs: u64) -> usize {
    stages
        .iter()
        .rposition(|stage| stage.threshold_secs <= duration_secs)
        .unwrap_or(0)
}

/// Tracks the active alert stage for a changing stillness duration.
#[derive(Debug, Clone)]
pub struct AlertResolver {
    stages: Vec<AlertStage>,
    active_index: usize,
}

impl AlertResolver {
    /// Creates a resolver over a validated stage table.
    pub fn new(stages: Vec<AlertStage>) -> Result<Self, ConfigError> {
        validate_stages(&stages)?;
        let active_index = resolve_index(&stages, 0);
        Ok(Self {
            stages,
            active_index,
        })
    }

    /// Resolver over the built-in five stage table.
    pub fn with_default_stages() -> Self {
        let stages = default_alert_stages();
        let active_index = resolve_index(&stages, 0);
        Self {
            stages,
            active_index,
        }
    }

    /// Stage that applies to `duration_secs`, without changing the active one.
    pub fn resolve(&self, duration_secs: u64) -> &AlertStage {
        &self.stages[resolve_index(&self.stages, duration_secs)]
    }

    /// Recomputes the active stage for a new duration.
    ///
    /// Returns the new stage when it differs from the previously active one.
    pub fn update(&mut self, duration_secs: u64) -> Option<&AlertStage> {
        let index = resolve_index(&self.stages, duration_secs);
        if index == self.active_index {
            return None;
        }

        let previous = self.active_index;
        self.active_index = index;
        debug!(
            duration_secs,
            from = previous,
            to = index,
            stage = %self.stages[index].message,
            "Alert stage changed"
        );
        Some(&self.stages[index])
    }

    pub fn active_stage(&self) -> &AlertStage {
        &self.stages[self.active_index]
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The default (first) stage.
    pub fn default_stage(&self) -> &AlertStage {
        &self.stages[0]
    }

    pub fn stages(&self) -> &[AlertStage] {
        &self.stages
    }
}

impl Default for AlertResolver {
    fn default() -> Self {
        Self::with_default_stages()
    }
}

// ============================================================================
// TESTS
// ============================================================================
