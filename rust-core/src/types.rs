//! Core data types for the stillness monitor.
//!
//! This module defines the values that cross component boundaries: raw
//! motion events coming in from the sensor, the staged alert table, and the
//! snapshot handed to the presentation layer.
//!
//! Design principle: if a concept exists, it gets a type. Raw tuples never
//! cross a module boundary.

use serde::{Deserialize, Serialize};

/// Tri-axial acceleration including gravity, in m/s².
///
/// Mirrors the `accelerationIncludingGravity` member of a DOM
/// `DeviceMotionEvent`. Values are f64 because that is what the platform
/// delivers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the vector. Returns m/s².
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A single motion event from the platform sensor stream.
///
/// The acceleration member is optional: some platforms fire motion events
/// without data (sensor warming up, desktop browsers). Such events are
/// ignored by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionEvent {
    #[serde(default)]
    pub acceleration_including_gravity: Option<Acceleration>,
}

impl MotionEvent {
    /// Creates an event carrying an acceleration reading.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            acceleration_including_gravity: Some(Acceleration::new(x, y, z)),
        }
    }

    /// Creates an event with no acceleration data.
    pub fn empty() -> Self {
        Self {
            acceleration_including_gravity: None,
        }
    }
}

/// One escalation level of the alert table.
///
/// A stage becomes eligible once the stillness duration reaches
/// `threshold_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertStage {
    /// Stillness duration (whole seconds) at which this stage applies.
    pub threshold_secs: u64,
    /// Human-readable message shown while the stage is active.
    pub message: String,
    /// Presentation color tag (CSS color name).
    pub color_tag: String,
}

impl AlertStage {
    pub fn new(
        threshold_secs: u64,
        message: impl Into<String>,
        color_tag: impl Into<String>,
    ) -> Self {
        Self {
            threshold_secs,
            message: message.into(),
            color_tag: color_tag.into(),
        }
    }
}

/// The built-in alert table, ascending by threshold.
///
/// The first entry doubles as the default stage: it is selected whenever no
/// other threshold has been reached, so its own `2` second threshold never
/// changes the outcome.
pub fn default_alert_stages() -> Vec<AlertStage> {
    vec![
        AlertStage::new(2, "Movement detected", "green"),
        AlertStage::new(10, "Stillness for 10 seconds", "yellow"),
        AlertStage::new(30, "Stillness for 30 seconds", "orange"),
        AlertStage::new(60, "Stillness for 1 minute", "red"),
        AlertStage::new(120, "Stillness for 2 minutes", "darkred"),
    ]
}

/// Result of feeding one motion event to the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Magnitude exceeded the threshold; last-movement instant was reset.
    Movement,
    /// Valid sample within the stillness band. No state change.
    Still,
    /// Sample had no usable acceleration data. No state change.
    Ignored,
}

/// Lifecycle phase of a monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Stopped,
    Running,
}

impl SessionPhase {
    /// Label of the control that flips this phase.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            SessionPhase::Stopped => "Start Detection",
            SessionPhase::Running => "Stop Detection",
        }
    }
}

/// Outcome of a motion permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Externally observable monitor state.
///
/// `active_stage` is always resolved from `stillness_duration_secs` before a
/// snapshot is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub stillness_duration_secs: u64,
    pub active_stage: AlertStage,
    pub is_running: bool,
    pub permission_granted: bool,
}

impl MonitorSnapshot {
    /// Initial snapshot of a monitor that has never been started.
    pub fn stopped(default_stage: AlertStage) -> Self {
        Self {
            stillness_duration_secs: 0,
            active_stage: default_stage,
            is_running: false,
            permission_granted: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_running {
            SessionPhase::Running
        } else {
            SessionPhase::Stopped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceleration_magnitude() {
        let accel = Acceleration::new(3.0, 4.0, 0.0);
        assert_eq!(accel.magnitude(), 5.0);
    }

    #[test]
    fn test_non_finite_acceleration() {
        assert!(Acceleration::new(0.0, 0.0, 9.8).is_finite());
        assert!(!Acceleration::new(f64::NAN, 0.0, 9.8).is_finite());
        assert!(!Acceleration::new(0.0, f64::INFINITY, 9.8).is_finite());
    }

    #[test]
    fn test_motion_event_json_shape() {
        let event: MotionEvent = serde_json::from_str(
            r#"{"accelerationIncludingGravity":{"x":0.1,"y":0.2,"z":9.7}}"#,
        )
        .unwrap();
        assert_eq!(event, MotionEvent::new(0.1, 0.2, 9.7));

        let missing: MotionEvent = serde_json::from_str("{}").unwrap();
        assert_eq!(missing, MotionEvent::empty());

        let null: MotionEvent =
            serde_json::from_str(r#"{"accelerationIncludingGravity":null}"#).unwrap();
        assert_eq!(null, MotionEvent::empty());
    }

    #[test]
    fn test_default_table_is_ascending() {
        let stages = default_alert_stages();
        assert_eq!(stages.len(), 5);
        assert!(stages
            .windows(2)
            .all(|pair| pair[0].threshold_secs <= pair[1].threshold_secs));
        assert_eq!(stages[0].color_tag, "green");
        assert_eq!(stages[4].color_tag, "darkred");
    }

    #[test]
    fn test_toggle_labels() {
        assert_eq!(SessionPhase::Stopped.toggle_label(), "Start Detection");
        assert_eq!(SessionPhase::Running.toggle_label(), "Stop Detection");
    }

    #[test]
    fn test_permission_status_serde() {
        let status: PermissionStatus = serde_json::from_str(r#""granted""#).unwrap();
        assert_eq!(status, PermissionStatus::Granted);
    }
}
