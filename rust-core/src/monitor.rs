//! Session lifecycle for the stillness monitor.
//!
//! `StillnessMonitor` is a two-state machine (Stopped, Running). Starting a
//! session checks the permission capability, attaches a motion listener and
//! spawns one task that owns the sampler, the ticker and the resolver.
//! Stopping signals that task and waits for it, so no tick or motion event
//! can publish after `stop` returns.
//!
//! # Architecture
//!
//! 1. **Permission**: implicit, or one awaited request per start
//! 2. **Attach**: subscribe to the `MotionBus`
//! 3. **Session task**: `select!` over stop signal, tick interval and motion
//!    events; every mutation happens on this task
//! 4. **Publish**: full `MonitorSnapshot` on a watch channel
//!
//! Dropping the monitor aborts a running session, which drops the
//! subscription and the interval with it, and publishes the same stopped
//! snapshot as `stop`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::alert::AlertResolver;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::permission::PermissionCapability;
use crate::sensor::{MotionBus, MotionSubscription};
use crate::session::StillnessSession;
use crate::types::{MonitorSnapshot, PermissionStatus, SessionPhase};

type SnapshotSender = Arc<watch::Sender<MonitorSnapshot>>;

/// Handles owned by a running session, released together on stop.
struct SessionHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Motion stillness monitor.
pub struct StillnessMonitor {
    config: MonitorConfig,
    resolver: AlertResolver,
    sensor: MotionBus,
    permission: PermissionCapability,
    snapshot_tx: SnapshotSender,
    permission_granted: bool,
    session: Option<SessionHandle>,
}

impl StillnessMonitor {
    /// Creates a stopped monitor.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(
        config: MonitorConfig,
        sensor: MotionBus,
        permission: PermissionCapability,
    ) -> Result<Self, MonitorError> {
        config.validate()?;
        let resolver = AlertResolver::new(config.alert_stages.clone())?;
        Ok(Self::from_parts(config, resolver, sensor, permission))
    }

    /// Monitor with default configuration and its own motion bus.
    pub fn with_defaults(permission: PermissionCapability) -> Self {
        let config = MonitorConfig::default();
        let sensor = MotionBus::new(config.sensor_buffer);
        Self::from_parts(config, AlertResolver::with_default_stages(), sensor, permission)
    }

    fn from_parts(
        config: MonitorConfig,
        resolver: AlertResolver,
        sensor: MotionBus,
        permission: PermissionCapability,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(MonitorSnapshot::stopped(resolver.resolve(0).clone()));
        Self {
            config,
            resolver,
            sensor,
            permission,
            snapshot_tx: Arc::new(snapshot_tx),
            permission_granted: false,
            session: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.session.is_some() {
            SessionPhase::Running
        } else {
            SessionPhase::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver notified on every published state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The motion source this monitor attaches to.
    pub fn sensor(&self) -> &MotionBus {
        &self.sensor
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Stopped → Running.
    ///
    /// No-op when already running. On denial or a failed request the
    /// monitor stays stopped with `permission_granted = false`.
    pub async fn start(&mut self) -> Result<(), MonitorError> {
        if self.session.is_some() {
            debug!("Start requested while running; ignoring");
            return Ok(());
        }

        let capability = self.permission.clone();
        match capability {
            PermissionCapability::Implicit => {
                debug!("No permission prompt on this platform; attaching directly");
            }
            PermissionCapability::Explicit(permission) => match permission.request().await {
                Ok(PermissionStatus::Granted) => {
                    info!("Motion permission granted");
                }
                Ok(status) => {
                    info!(?status, "Motion permission not granted; staying stopped");
                    self.set_permission_granted(false);
                    return Err(MonitorError::PermissionDenied { status });
                }
                Err(err) => {
                    warn!(error = %err, "Motion permission request failed");
                    self.set_permission_granted(false);
                    let reason = match err {
                        MonitorError::PermissionRequestFailed(reason) => reason,
                        other => other.to_string(),
                    };
                    return Err(MonitorError::PermissionRequestFailed(reason));
                }
            },
        }

        self.attach();
        Ok(())
    }

    /// Running → Stopped.
    ///
    /// Waits for the session task to exit, then publishes a zeroed
    /// snapshot. Stopping a stopped monitor does nothing.
    pub async fn stop(&mut self) {
        let Some(handle) = self.session.take() else {
            debug!("Stop requested while stopped; ignoring");
            return;
        };

        // The task may already be gone if the runtime is shutting down.
        let _ = handle.shutdown_tx.send(());
        if let Err(err) = handle.task.await {
            if !err.is_cancelled() {
                warn!(error = %err, "Session task ended abnormally");
            }
        }

        self.publish_stopped();
        info!("Stillness detection stopped");
    }

    /// Flips between Running and Stopped.
    ///
    /// Start failures are logged, not returned.
    pub async fn toggle_detection(&mut self) {
        debug!(action = self.phase().toggle_label(), "Toggle requested");
        if self.is_running() {
            self.stop().await;
            return;
        }

        if let Err(err) = self.start().await {
            debug!(error = %err, "Detection not started");
        }
    }

    /// Stops any running session and consumes the monitor.
    pub async fn shutdown(mut self) {
        self.stop().await;
    }

    // =========================================================================
    // PRIVATE METHODS
    // =========================================================================

    fn attach(&mut self) {
        let subscription = self.sensor.subscribe();
        let session = StillnessSession::new(self.config.sampler.clone(), self.resolver.clone(), 0);

        self.permission_granted = true;
        self.snapshot_tx.send_replace(session.snapshot());

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_session(
            session,
            subscription,
            self.config.ticker.interval(),
            Instant::now(),
            Arc::clone(&self.snapshot_tx),
            shutdown_rx,
        ));

        self.session = Some(SessionHandle { shutdown_tx, task });
        info!(
            interval_ms = self.config.ticker.interval_ms,
            threshold = self.config.sampler.stillness_threshold_mps2,
            "Stillness detection started"
        );
    }

    fn publish_stopped(&self) {
        self.snapshot_tx.send_replace(MonitorSnapshot {
            stillness_duration_secs: 0,
            active_stage: self.resolver.resolve(0).clone(),
            is_running: false,
            permission_granted: self.permission_granted,
        });
    }

    fn set_permission_granted(&mut self, granted: bool) {
        self.permission_granted = granted;
        self.snapshot_tx.send_modify(|snapshot| snapshot.permission_granted = granted);
    }
}

impl Drop for StillnessMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.task.abort();
            self.publish_stopped();
            debug!("Monitor dropped while running; session aborted");
        }
    }
}

impl std::fmt::Debug for StillnessMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StillnessMonitor")
            .field("phase", &self.phase())
            .field("permission", &self.permission)
            .field("snapshot", &*self.snapshot_tx.borrow())
            .finish()
    }
}

/// Session-relative milliseconds since `started`.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn run_session(
    mut session: StillnessSession,
    mut motion: MotionSubscription,
    tick_every: Duration,
    started: Instant,
    snapshot_tx: SnapshotSender,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticks = tokio::time::interval_at(started + tick_every, tick_every);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sensor_open = true;

    loop {
        tokio::select! {
            biased;

            // Fires on an explicit stop and when the monitor is dropped.
            _ = &mut shutdown_rx => break,

            _ = ticks.tick() => {
                if session.on_tick(elapsed_ms(started)) {
                    snapshot_tx.send_replace(session.snapshot());
                }
            }

            event = motion.recv(), if sensor_open => match event {
                Some(event) => {
                    if session.on_motion(&event, elapsed_ms(started)) {
                        snapshot_tx.send_replace(session.snapshot());
                    }
                }
                None => {
                    sensor_open = false;
                    warn!("Motion source closed; duration keeps counting");
                }
            },
        }
    }

    let (movements, ignored) = session.sampler().statistics();
    debug!(
        movements,
        ignored,
        last_duration_secs = session.duration_secs(),
        "Session task exiting"
    );
}

// ============================================================================
// TESTS
// ============================================================================
