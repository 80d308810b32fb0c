//! Idlewatch CLI
//!
//! Runs the idle/presence rollup pipeline. Raw input events arrive as
//! newline-delimited JSON on stdin, emitted by an external hook process;
//! this binary never touches input devices itself.

use std::io::BufRead;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use idlewatch::{
    ActivityEvent, ActivityRollup, Config, EventSender, Fanout, RollupScheduler, VERSION,
};

#[derive(Parser)]
#[command(name = "idlewatch")]
#[command(version = VERSION)]
#[command(about = "Adaptive idle/presence rollup pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline, reading events as JSON lines on stdin
    Run {
        /// Inactivity window in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// Pacing sleep floor in seconds
        #[arg(long)]
        min_sleep_secs: Option<u64>,

        /// Number of broadcast destinations
        #[arg(long)]
        fanout: Option<usize>,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            window_secs,
            min_sleep_secs,
            fanout,
        } => cmd_run(window_secs, min_sleep_secs, fanout),
        Commands::Config => cmd_config(),
    }
}

fn cmd_run(
    window_secs: Option<u64>,
    min_sleep_secs: Option<u64>,
    fanout: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = Config::load().unwrap_or_default();
    if let Some(secs) = window_secs {
        config.inactivity_window = std::time::Duration::from_secs(secs);
    }
    if let Some(secs) = min_sleep_secs {
        config.min_sleep_time = std::time::Duration::from_secs(secs);
    }
    if let Some(n) = fanout {
        config.fanout = n.max(1);
    }

    info!(
        version = VERSION,
        window_s = config.inactivity_window.as_secs(),
        min_sleep_s = config.min_sleep_time.as_secs(),
        fanout = config.fanout,
        "starting pipeline"
    );

    // Everything downstream of the bridge runs on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    runtime.block_on(run_pipeline(config))
}

async fn run_pipeline(config: Config) -> anyhow::Result<()> {
    let (sender, stream) = idlewatch::source::channel();
    let shutdown = CancellationToken::new();
    install_ctrlc(shutdown.clone())?;
    spawn_stdin_reader(sender);

    let (scheduler, rollups) = RollupScheduler::new(stream, &config);
    let (fanout, outputs) = Fanout::new(rollups, config.fanout, config.channel_capacity);

    let mut tasks = vec![
        tokio::spawn(scheduler.run(shutdown.clone())),
        tokio::spawn(fanout.run(shutdown.clone())),
    ];

    // Example consumers: one filters for inactivity, one for activity,
    // any further destinations are drained so they never stall the rest.
    for (index, output) in outputs.into_iter().enumerate() {
        tasks.push(match index {
            0 => tokio::spawn(log_inactivity(output)),
            1 => tokio::spawn(log_activity(output)),
            _ => tokio::spawn(drain(output)),
        });
    }

    for task in tasks {
        task.await.context("pipeline task panicked")?;
    }
    info!("pipeline stopped");
    Ok(())
}

/// Feed stdin lines through the bridge from a producer thread.
///
/// The thread exits on EOF; the pipeline keeps running and simply reports
/// inactivity from then on, the same as any silent hook.
fn spawn_stdin_reader(sender: EventSender) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(%err, "stdin read failed");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ActivityEvent>(line) {
                Ok(event) => sender.emit(event),
                Err(err) => warn!(%err, "ignoring malformed event line"),
            }
        }
        debug!("stdin closed, event producer exiting");
    });
}

async fn log_inactivity(mut rollups: mpsc::Receiver<ActivityRollup>) {
    while let Some(rollup) = rollups.recv().await {
        if rollup.classification.is_inactivity() {
            info!(
                target: "idlewatch::inactivity",
                idle_for_s = rollup.elapsed_since_latest_event.num_seconds(),
                latest_event = %rollup.latest_event_time.format("%H:%M:%S"),
                "user is inactive"
            );
        }
    }
}

async fn log_activity(mut rollups: mpsc::Receiver<ActivityRollup>) {
    while let Some(rollup) = rollups.recv().await {
        if !rollup.classification.is_inactivity() {
            info!(
                target: "idlewatch::activity",
                latest_event = %rollup.latest_event_time.format("%H:%M:%S"),
                "user is active"
            );
        }
    }
}

async fn drain(mut rollups: mpsc::Receiver<ActivityRollup>) {
    while rollups.recv().await.is_some() {}
}

fn cmd_config() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_default();

    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("failed to render config")?
    );
    Ok(())
}

/// Cancel the shutdown token on Ctrl+C.
fn install_ctrlc(shutdown: CancellationToken) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        shutdown.cancel();
    })
    .context("failed to set Ctrl+C handler")
}
