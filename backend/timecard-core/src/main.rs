// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timecard_core::{run, Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Timecard Script: Version {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()
        .context("Loading TIMECARD_* configuration failed")?
        .with_cli(cli);
    info!(
        "Reading inputs from {} (week numbering: {:?})",
        config.input_dir.display(),
        config.week_numbering
    );

    let summary = run(&config).with_context(|| {
        format!(
            "Building timecard reports from {} failed",
            config.input_dir.display()
        )
    })?;

    info!(
        "Processed {} timecard records for {} - {}",
        summary.attendance_rows,
        summary.period.start_label(),
        summary.period.end_label()
    );
    info!("TOTAL HOURS:");
    for (category, hours) in summary.totals.breakdown() {
        info!("  {}: {:.1}", category, hours);
    }

    Ok(())
}
