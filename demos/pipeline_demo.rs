//! Demonstration of the idlewatch rollup pipeline.
//!
//! This example shows how to:
//! 1. Create the event bridge and feed it from a producer thread
//! 2. Run the self-pacing rollup scheduler
//! 3. Broadcast rollups to independent consumers
//!
//! Run with: cargo run --example pipeline_demo
//!
//! No OS input hooks are involved - a synthetic producer plays the role
//! of the external hook, emitting bursts of activity followed by silence.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use idlewatch::{ActivityEvent, ActivityRollup, Config, EventSender, Fanout, RollupScheduler};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("Idlewatch - Pipeline Demo");
    println!("=========================");
    println!();

    let config = Config {
        inactivity_window: Duration::from_secs(2),
        min_sleep_time: Duration::from_millis(500),
        fanout: 2,
        channel_capacity: 64,
    };

    println!(
        "Window: {}s, sleep floor: {}ms, fan-out: {}",
        config.inactivity_window.as_secs(),
        config.min_sleep_time.as_millis(),
        config.fanout
    );
    println!("Simulating two bursts of input, then silence...");
    println!();

    let (sender, stream) = idlewatch::source::channel();
    spawn_synthetic_hook(sender);

    let (scheduler, rollups) = RollupScheduler::new(stream, &config);
    let (fanout, mut outputs) = Fanout::new(rollups, config.fanout, config.channel_capacity);

    let shutdown = CancellationToken::new();
    let mut tasks = vec![
        tokio::spawn(scheduler.run(shutdown.clone())),
        tokio::spawn(fanout.run(shutdown.clone())),
    ];

    let activity_queue = outputs.remove(0);
    let inactivity_queue = outputs.remove(0);
    tasks.push(tokio::spawn(print_rollups("activity  ", activity_queue, false)));
    tasks.push(tokio::spawn(print_rollups("inactivity", inactivity_queue, true)));

    // Let the pipeline run long enough to see both classifications.
    tokio::time::sleep(Duration::from_secs(12)).await;
    shutdown.cancel();
    for task in tasks {
        let _ = task.await;
    }

    println!();
    println!("Demo complete!");
}

/// Play the external hook: two bursts of mouse movement with a click at
/// the end of each, one second apart, then go quiet.
fn spawn_synthetic_hook(sender: EventSender) {
    std::thread::spawn(move || {
        for burst in 0..2 {
            for _ in 0..20 {
                sender.emit(ActivityEvent::moved());
                std::thread::sleep(Duration::from_millis(10));
            }
            sender.emit(ActivityEvent::click());
            println!("  [hook] burst {} emitted", burst + 1);
            std::thread::sleep(Duration::from_secs(1));
        }
        println!("  [hook] going silent");
    });
}

/// Consumer that prints only one side of the classification.
async fn print_rollups(
    name: &'static str,
    mut queue: mpsc::Receiver<ActivityRollup>,
    inactivity: bool,
) {
    while let Some(rollup) = queue.recv().await {
        if rollup.classification.is_inactivity() != inactivity {
            continue;
        }
        println!(
            "  [{name}] {} at {} (latest event {}, {:.1}s ago)",
            rollup.classification,
            rollup.time.format("%H:%M:%S%.3f"),
            rollup.latest_event_time.format("%H:%M:%S%.3f"),
            rollup.elapsed_since_latest_event.num_milliseconds() as f64 / 1000.0
        );
    }
}
