/// Basic usage example: feed motion events, watch the stillness alert escalate.
///
/// Runs on a paused Tokio clock so the two simulated minutes finish
/// instantly.
use std::time::Duration;

use stillness_monitor::{MonitorSnapshot, MotionEvent, PermissionCapability, StillnessMonitor};

#[tokio::main(flavor = "current_thread", start_paused = true)]
async fn main() {
    println!("=== Stillness Monitor: Basic Example ===\n");

    let mut monitor = StillnessMonitor::with_defaults(PermissionCapability::Implicit);
    let mut updates = monitor.subscribe();
    monitor.toggle_detection().await;

    // Simulated session: (seconds into session, acceleration including gravity)
    let timeline = vec![
        // Phone resting on a table
        (1, [0.02, 0.05, 9.81]),
        (5, [0.01, 0.04, 9.79]),
        // Picked up at 12s
        (12, [1.40, 0.90, 10.30]),
        // Put back down
        (13, [0.03, 0.02, 9.80]),
        (40, [0.02, 0.03, 9.81]),
    ];

    let mut elapsed = 0;
    for (at_secs, [x, y, z]) in timeline {
        tokio::time::sleep(Duration::from_secs(at_secs - elapsed)).await;
        elapsed = at_secs;
        monitor.sensor().publish(MotionEvent::new(x, y, z));
        println!("t={:>3}s  sample ({x:.2}, {y:.2}, {z:.2})", at_secs);
    }

    // Let the device sit for a while longer.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(120);
    while tokio::time::timeout_at(deadline, updates.changed()).await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.stillness_duration_secs % 30 == 0 {
            print_snapshot(&snapshot);
        }
    }

    monitor.toggle_detection().await;
    println!("\n=== After stop ===");
    print_snapshot(&monitor.snapshot());
}

fn print_snapshot(snapshot: &MonitorSnapshot) {
    println!(
        "  still {:>3}s  {:<26} [{}]  running={}",
        snapshot.stillness_duration_secs,
        snapshot.active_stage.message,
        snapshot.active_stage.color_tag,
        snapshot.is_running
    );
}
