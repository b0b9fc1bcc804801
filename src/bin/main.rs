//! `emon`: the edge-docked telemetry overlay.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::info;

use emonlib::config::Config;
use emonlib::error::Result;

#[derive(Parser)]
#[command(name = "emon")]
#[command(
    about = "Edge Monitor: hover-revealed telemetry overlay docked to the screen edge",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Print one metrics snapshot as JSON and exit, without a window
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(interval) = cli.interval {
        config.sampling.interval_ms = interval;
    }

    if cli.snapshot {
        return snapshot(&config);
    }

    info!(
        "starting overlay, sampling every {} ms",
        config.sampling.interval_ms
    );
    emonlib::gui::run(config)
}

/// Headless one-shot dump of everything the overlay would display.
fn snapshot(config: &Config) -> Result<()> {
    use emonlib::metrics::{MetricsProvider, PlatformProvider};

    let mut provider = PlatformProvider::new();

    // The first CPU reading only primes the counters.
    let _ = provider.cpu_percent();
    std::thread::sleep(Duration::from_millis(200));

    let disk = provider
        .disk_usage(&config.sampling.primary_disk_path)
        .or_else(|_| provider.disk_usage(&config.sampling.fallback_disk_path))
        .ok();

    let snapshot = serde_json::json!({
        "cpu_percent": provider.cpu_percent().ok(),
        "cpu_frequency_mhz": provider.cpu_frequency_mhz().ok().flatten(),
        "cores": provider.cpu_core_counts(),
        "memory": provider.memory().ok(),
        "disk_usage": disk,
        "disk_io": provider.disk_io_counters().ok(),
        "net_io": provider.net_io_counters().ok(),
        "boot_time_epoch": provider.boot_time().ok(),
        "process_count": provider.process_count().ok(),
        "gpus": provider.gpu_snapshot().unwrap_or_default(),
        "host": provider.host_info(),
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
