//! Deterministic session core.
//!
//! Composes the sampler, ticker and alert resolver over one running
//! session. All inputs carry explicit session-relative timestamps; the async
//! driver in `monitor` supplies them from the runtime clock.
//!
//! Invariant: after every call that changes the duration, the active stage
//! has already been re-resolved, so a snapshot taken at any point is
//! consistent.

use crate::alert::AlertResolver;
use crate::sampler::{MotionSampler, SamplerConfig};
use crate::ticker::DurationTicker;
use crate::types::{AlertStage, MonitorSnapshot, MotionEvent, SampleOutcome};

/// State of one running monitoring session.
#[derive(Debug, Clone)]
pub struct StillnessSession {
    sampler: MotionSampler,
    ticker: DurationTicker,
    resolver: AlertResolver,
}

impl StillnessSession {
    /// Starts a session whose last movement is `now_ms`.
    pub fn new(sampler_config: SamplerConfig, mut resolver: AlertResolver, now_ms: u64) -> Self {
        resolver.update(0);
        Self {
            sampler: MotionSampler::new(sampler_config, now_ms),
            ticker: DurationTicker::new(),
            resolver,
        }
    }

    /// Feeds one motion event.
    ///
    /// Movement zeroes the duration immediately. Returns true when the
    /// observable state changed.
    pub fn on_motion(&mut self, event: &MotionEvent, now_ms: u64) -> bool {
        match self.sampler.process_event(event, now_ms) {
            SampleOutcome::Movement => {
                let changed = self.ticker.reset();
                self.resolver.update(0);
                changed
            }
            SampleOutcome::Still | SampleOutcome::Ignored => false,
        }
    }

    /// Periodic duration update. Returns true when the observable state
    /// changed.
    pub fn on_tick(&mut self, now_ms: u64) -> bool {
        match self.ticker.tick(now_ms, self.sampler.last_movement_ms()) {
            Some(secs) => {
                self.resolver.update(secs);
                true
            }
            None => false,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.ticker.published_secs()
    }

    pub fn active_stage(&self) -> &AlertStage {
        self.resolver.active_stage()
    }

    pub fn sampler(&self) -> &MotionSampler {
        &self.sampler
    }

    /// Snapshot of a running session.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            stillness_duration_secs: self.duration_secs(),
            active_stage: self.active_stage().clone(),
            is_running: true,
            permission_granted: true,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
