use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use exposure_dashboard::config::Config;
use exposure_dashboard::pipeline::{Dashboard, Snapshot};
use exposure_dashboard::sources::{HttpSheetSource, SheetSource, StaticSheetSource};

#[tokio::main]
async fn main() -> Result<()> {
    let mut cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if let Err(e) = cfg.load_tuning() {
        warn!("{:#}; using default scoring config", e);
    }

    let args: Vec<String> = std::env::args().collect();
    let once = args.iter().any(|a| a == "--once");
    let fixtures = args
        .iter()
        .position(|a| a == "--fixtures")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let source: Arc<dyn SheetSource> = match &fixtures {
        Some(dir) => Arc::new(
            StaticSheetSource::from_dir(dir)
                .with_context(|| format!("Failed to load fixtures from {}", dir.display()))?,
        ),
        None => Arc::new(HttpSheetSource::new(&cfg)),
    };

    let interval = Duration::from_secs(cfg.refresh_interval_secs.max(1));
    let dashboard = Dashboard::new(cfg, source);

    if once {
        let snapshot = dashboard
            .refresh()
            .await
            .context("Refresh did not run")?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    info!("Dashboard is now running. Press Ctrl+C to stop.");
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Some(snapshot) = dashboard.refresh().await {
                    log_summary(&snapshot);
                }
            }
        }
    }
}

fn log_summary(snapshot: &Snapshot) {
    for c in &snapshot.exposure.components {
        info!("  {:<16} {:>5.1} / {:>4.1}", c.name, c.points, c.max_points);
        if let Some(w) = &c.warning {
            warn!("  {} [{}]", w.label, w.severity);
        }
    }
    for entry in snapshot.overlaps.overlaps(2).iter().take(10) {
        info!(
            "  overlap {} {} x{} [{}]",
            entry.ticker,
            entry.display_name.as_deref().unwrap_or("-"),
            entry.count(),
            entry.screens.join(", ")
        );
    }
    for fault in &snapshot.faults {
        warn!("  {}: {}", fault.key, fault.user_message);
    }
}
