//! Stillness duration ticking.
//!
//! Converts the time elapsed since the last movement into whole seconds and
//! publishes it on a fixed cadence. The ticker holds no clock of its own:
//! callers pass session-relative timestamps, which keeps it deterministic.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Parameters for the duration ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Publish cadence in milliseconds.
    pub interval_ms: u64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Whole seconds between `last_movement_ms` and `now_ms`, floored.
///
/// Saturates at zero if `now_ms` precedes the last movement.
pub fn elapsed_secs(now_ms: u64, last_movement_ms: u64) -> u64 {
    now_ms.saturating_sub(last_movement_ms) / 1000
}

/// Publishes the current stillness duration.
#[derive(Debug, Clone, Default)]
pub struct DurationTicker {
    published_secs: u64,
    tick_count: u64,
}

impl DurationTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the duration at `now_ms`.
    ///
    /// Returns the new duration when it differs from the last published one.
    pub fn tick(&mut self, now_ms: u64, last_movement_ms: u64) -> Option<u64> {
        self.tick_count += 1;
        let secs = elapsed_secs(now_ms, last_movement_ms);
        trace!(now_ms, secs, "Tick");

        if secs == self.published_secs {
            return None;
        }
        self.published_secs = secs;
        Some(secs)
    }

    /// Publishes zero. Returns true if the duration changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.published_secs != 0;
        self.published_secs = 0;
        changed
    }

    pub fn published_secs(&self) -> u64 {
        self.published_secs
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

// ============================================================================
// TESTS
// ============================================================================
