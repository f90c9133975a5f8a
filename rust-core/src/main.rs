//! Stillness Monitor CLI
//!
//! Reads device motion events as JSON lines on stdin, one per line:
//!
//! ```text
//! {"accelerationIncludingGravity":{"x":0.02,"y":0.11,"z":9.79}}
//! ```
//!
//! and renders the stillness duration and active alert to stdout whenever
//! they change. Logs go to stderr.

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use stillness_monitor::{
    FixedPermission, MonitorConfig, MonitorError, MonitorSnapshot, MotionBus, MotionEvent,
    PermissionCapability, PermissionStatus, StillnessMonitor,
};

const PERMISSION_HINT: &str = "You'll need to grant motion sensor permissions when you start.";

#[derive(Parser)]
#[command(name = "stillness-monitor")]
#[command(about = "Track how long a device has been still")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How the platform grants access to motion events
    #[arg(long, value_enum, default_value_t = PermissionMode::Implicit)]
    permission: PermissionMode,

    /// Keep monitoring after stdin closes, until Ctrl-C
    #[arg(long)]
    follow: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PermissionMode {
    /// No permission prompt
    Implicit,
    /// Prompt, answered with a grant
    Granted,
    /// Prompt, answered with a denial
    Denied,
}

impl PermissionMode {
    fn capability(self) -> PermissionCapability {
        match self {
            PermissionMode::Implicit => PermissionCapability::Implicit,
            PermissionMode::Granted => {
                PermissionCapability::explicit(FixedPermission(PermissionStatus::Granted))
            }
            PermissionMode::Denied => {
                PermissionCapability::explicit(FixedPermission(PermissionStatus::Denied))
            }
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "Failed to start runtime");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run(cli));
    // Do not wait on leftover blocking work.
    runtime.shutdown_background();

    if let Err(err) = result {
        error!(error = %err, "stillness-monitor failed");
        std::process::exit(1);
    }
}

fn init_logging() {
    let debug_enabled = env::var("STILLNESS_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), MonitorError> {
    let config = match &cli.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };
    let sensor = MotionBus::new(config.sensor_buffer);
    let capability = cli.permission.capability();
    if capability.requires_request() {
        info!("Requesting motion sensor permission");
    }
    let mut monitor = StillnessMonitor::new(config, sensor.clone(), capability)?;
    let mut snapshots = monitor.subscribe();

    render(&snapshots.borrow_and_update());
    if let Err(err) = monitor.start().await {
        if !err.is_permission_error() {
            return Err(err);
        }
        info!(error = %err, "Detection not started");
        render(&snapshots.borrow_and_update());
        return Ok(());
    }

    let mut lines = spawn_input_reader(io::BufReader::new(io::stdin()));
    let mut input_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }

            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&snapshots.borrow_and_update());
            }

            line = lines.recv(), if input_open => match line {
                Some(Ok(line)) => forward(&sensor, &line),
                None if cli.follow => {
                    info!("Input closed; still monitoring until Ctrl-C");
                    input_open = false;
                }
                None => {
                    info!("Input closed");
                    break;
                }
                Some(Err(err)) => {
                    warn!(error = %err, "Failed to read motion input");
                    break;
                }
            },
        }
    }

    monitor.shutdown().await;
    render(&snapshots.borrow_and_update());
    Ok(())
}

/// Reads lines on a detached OS thread and hands them to the runtime.
///
/// The read blocks and cannot be cancelled, so it stays off the runtime's
/// blocking pool. The thread ends when the input closes or the receiver is
/// dropped.
fn spawn_input_reader<R>(reader: R) -> mpsc::UnboundedReceiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = thread::Builder::new()
        .name("motion-input".into())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });
    if let Err(err) = spawned {
        warn!(error = %err, "Failed to start input reader; no motion input");
    }
    rx
}

/// Parses one input line and publishes it to the motion bus.
fn forward(sensor: &MotionBus, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<MotionEvent>(line) {
        Ok(event) => {
            sensor.publish(event);
        }
        Err(err) => {
            debug!(error = %err, "Ignoring malformed motion sample");
        }
    }
}

fn render(snapshot: &MonitorSnapshot) {
    println!("[{}]", snapshot.phase().toggle_label());
    println!("Stillness duration: {}s", snapshot.stillness_duration_secs);
    println!(
        "{} [{}]",
        snapshot.active_stage.message, snapshot.active_stage.color_tag
    );
    if !snapshot.permission_granted {
        println!("{PERMISSION_HINT}");
    }
}
