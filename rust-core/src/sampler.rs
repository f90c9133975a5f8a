//! Motion sampling and movement detection.
//!
//! Each motion event is reduced to one scalar: the magnitude of
//! acceleration-including-gravity minus a fixed gravity constant. When that
//! value leaves the stillness band the device is considered to have moved
//! and the last-movement instant is reset.
//!
//! Design note: gravity compensation is a constant, not a per-device
//! calibration, and there is no smoothing. One sample over the threshold is
//! movement.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::{Acceleration, MotionEvent, SampleOutcome};

/// Parameters for movement detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Gravity constant subtracted from the measured magnitude (m/s²).
    pub gravity_mps2: f64,

    /// Stillness band half-width (m/s²). A compensated magnitude strictly
    /// greater than this, in absolute value, counts as movement.
    pub stillness_threshold_mps2: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            gravity_mps2: 9.8,
            stillness_threshold_mps2: 0.1,
        }
    }
}

/// Tracks the instant of the last detected movement.
#[derive(Debug, Clone)]
pub struct MotionSampler {
    config: SamplerConfig,

    /// Session-relative timestamp (ms) of the last movement.
    last_movement_ms: u64,

    // Statistics
    movement_count: u64,
    ignored_count: u64,
}

impl MotionSampler {
    /// Creates a sampler whose last movement is `now_ms`.
    pub fn new(config: SamplerConfig, now_ms: u64) -> Self {
        Self {
            config,
            last_movement_ms: now_ms,
            movement_count: 0,
            ignored_count: 0,
        }
    }

    /// Gravity-compensated movement magnitude in m/s².
    ///
    /// Negative when the measured magnitude is below the gravity constant
    /// (free fall, sensor offset).
    pub fn movement_magnitude(&self, accel: &Acceleration) -> f64 {
        accel.magnitude() - self.config.gravity_mps2
    }

    /// True when `magnitude` lies outside the stillness band.
    pub fn exceeds_threshold(&self, magnitude: f64) -> bool {
        magnitude.abs() > self.config.stillness_threshold_mps2
    }

    /// Feeds one motion event observed at `now_ms`.
    pub fn process_event(&mut self, event: &MotionEvent, now_ms: u64) -> SampleOutcome {
        let accel = match event.acceleration_including_gravity {
            Some(accel) if accel.is_finite() => accel,
            _ => {
                self.ignored_count += 1;
                trace!(now_ms, "Ignoring motion event without acceleration data");
                return SampleOutcome::Ignored;
            }
        };

        let magnitude = self.movement_magnitude(&accel);
        if !self.exceeds_threshold(magnitude) {
            return SampleOutcome::Still;
        }

        self.last_movement_ms = now_ms;
        self.movement_count += 1;
        debug!(now_ms, magnitude, "Movement detected");
        SampleOutcome::Movement
    }

    /// Restarts tracking as if movement had just occurred at `now_ms`.
    pub fn rearm(&mut self, now_ms: u64) {
        self.last_movement_ms = now_ms;
    }

    pub(crate) fn last_movement_ms(&self) -> u64 {
        self.last_movement_ms
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Get sampler statistics (movements, ignored samples).
    pub fn statistics(&self) -> (u64, u64) {
        (self.movement_count, self.ignored_count)
    }
}

// ============================================================================
// TESTS
// ============================================================================
