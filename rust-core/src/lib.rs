//! Stillness Monitor Library
//!
//! Samples a device accelerometer, tracks how long the device has been
//! still, and maps that duration onto a staged alert table.
//!
//! # Components
//!
//! - **Motion Sampler** (`sampler`): gravity-compensated magnitude against a
//!   fixed threshold; resets the last-movement instant.
//! - **Duration Ticker** (`ticker`): whole seconds since the last movement,
//!   published once per tick.
//! - **Alert Resolver** (`alert`): highest reached stage, first stage as
//!   default.
//! - **Lifecycle** (`monitor`): permission check, session task, start/stop,
//!   teardown.
//!
//! # Example
//!
//! ```no_run
//! use stillness_monitor::{MotionEvent, PermissionCapability, StillnessMonitor};
//!
//! # async fn demo() {
//! let mut monitor = StillnessMonitor::with_defaults(PermissionCapability::Implicit);
//! monitor.toggle_detection().await;
//!
//! // Platform side: forward device motion events.
//! monitor.sensor().publish(MotionEvent::new(0.0, 0.3, 9.8));
//!
//! let snapshot = monitor.snapshot();
//! println!("{}s: {}", snapshot.stillness_duration_secs, snapshot.active_stage.message);
//!
//! monitor.shutdown().await;
//! # }
//! ```

pub mod alert;
pub mod config;
pub mod error;
pub mod monitor;
pub mod permission;
pub mod sampler;
pub mod sensor;
pub mod session;
pub mod ticker;
pub mod types;

#[cfg(test)]
mod stress_tests;

// Re-export commonly used types
pub use alert::AlertResolver;
pub use config::MonitorConfig;
pub use error::{ConfigError, MonitorError};
pub use monitor::StillnessMonitor;
pub use permission::{FixedPermission, MotionPermission, PermissionCapability, PermissionFuture};
pub use sampler::{MotionSampler, SamplerConfig};
pub use sensor::{MotionBus, MotionSubscription};
pub use session::StillnessSession;
pub use ticker::{DurationTicker, TickerConfig};
pub use types::{
    default_alert_stages, Acceleration, AlertStage, MonitorSnapshot, MotionEvent,
    PermissionStatus, SampleOutcome, SessionPhase,
};
