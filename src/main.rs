// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use hintframe::config::HintConfig;
use hintframe::display::{DisplayError, DisplayGate, DisplayInterceptor, DisplaySink};
use hintframe::diagnostics::SystemMonitor;
use hintframe::registry::{HintStore, PooledHintRegistry};
use hintframe::subjects::StaticSubjects;
use hintframe::tasks::SweepLoop;
use hintframe::HintApi;

/// Demo daemon: runs the hint engine against a static subject roster and
/// logs every forwarded hint.
#[derive(Parser, Debug)]
#[command(name = "hintframed", version)]
struct Args {
    /// Delay between sweep ticks, in milliseconds
    #[arg(long, env = "HINT_SWEEP_DELAY_MS")]
    sweep_delay_ms: Option<u64>,

    /// Record pool capacity
    #[arg(long, env = "HINT_POOL_CAPACITY")]
    pool_capacity: Option<usize>,

    /// Per-subject hint cap
    #[arg(long, env = "HINT_MAX_PER_SUBJECT")]
    max_per_subject: Option<usize>,

    /// Disable the periodic health monitor
    #[arg(long)]
    no_monitor: bool,
}

/// Sink that renders forwarded hints to the log.
struct LogSink;

impl DisplaySink for LogSink {
    fn show(&self, subject: &str, text: &str, duration_secs: f32) -> Result<(), DisplayError> {
        info!("[{}] {} ({}s)", subject, text, duration_secs);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let mut config = HintConfig::from_env();
    if let Some(ms) = args.sweep_delay_ms {
        config.sweep_delay = Duration::from_millis(ms);
    }
    if let Some(capacity) = args.pool_capacity {
        config.pool_capacity = capacity;
    }
    if let Some(cap) = args.max_per_subject {
        config.max_hints_per_subject = cap;
    }
    if args.no_monitor {
        config.monitor_enabled = false;
    }

    info!("Starting hintframed");
    info!("{}", config.summary());

    let store = Arc::new(PooledHintRegistry::new(
        config.pool_capacity,
        config.max_hints_per_subject,
    ));
    let provider = Arc::new(StaticSubjects::new(["alpha", "beta", "gamma"]));
    let gate = Arc::new(DisplayGate::new());
    let interceptor = Arc::new(DisplayInterceptor::new(store.clone(), gate.clone()));
    let api = HintApi::new(store.clone(), provider.clone());

    let sweep = SweepLoop::new(
        store.clone(),
        provider.clone(),
        interceptor,
        config.sweep_delay,
    );
    let sweep_handle = sweep.spawn(Arc::new(LogSink));

    let monitor_handle = if config.monitor_enabled {
        let monitor = SystemMonitor::new(store.clone(), provider.clone(), config.monitor_interval);
        Some(monitor.spawn())
    } else {
        None
    };

    // Seed some traffic so the demo has something to show.
    api.post_to_all("Welcome to hintframe", 10.0, 0, "hintframed");
    api.post("alpha", "High priority for alpha", 30.0, 5, "hintframed");

    info!("Running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    sweep_handle.stop().await;
    if let Some((stop_tx, handle)) = monitor_handle {
        let _ = stop_tx.send(true);
        handle.abort();
    }
    store.cleanup();
    gate.clear();
    Ok(())
}
