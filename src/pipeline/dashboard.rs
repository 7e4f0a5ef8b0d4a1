use chrono_tz::Asia::Tokyo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::{Config, SourceSpec};
use crate::pipeline::snapshot::{build_snapshot, Snapshot};
use crate::sources::{FetchError, SheetSource};

/// Clears the busy flag when a cycle ends, including on early return.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Dashboard {
    cfg: Config,
    source: Arc<dyn SheetSource>,
    busy: AtomicBool,
}

impl Dashboard {
    pub fn new(cfg: Config, source: Arc<dyn SheetSource>) -> Self {
        info!("{}", "=".repeat(60));
        info!("Exposure dashboard starting up");
        info!("Sources:");
        for spec in &cfg.sources {
            info!("  {} ({}) gid={}", spec.key, spec.kind, spec.gid);
        }
        info!("Refresh every {}s", cfg.refresh_interval_secs);
        info!("{}", "=".repeat(60));

        Self {
            cfg,
            source,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one fetch-and-build cycle. Returns `None` without doing anything
    /// when another cycle is still in flight.
    pub async fn refresh(&self) -> Option<Snapshot> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh already in flight, skipping");
            return None;
        }
        let _guard = BusyGuard(&self.busy);

        let started = Instant::now();
        let fetched = self.fetch_all().await;
        let snapshot = build_snapshot(&self.cfg, fetched);

        info!(
            "Refresh done in {:.2}s at {} | score {:.1} ({}) | {} screens, {} tickers, {} overlaps | {} faults",
            started.elapsed().as_secs_f64(),
            snapshot.fetched_at.with_timezone(&Tokyo).format("%Y-%m-%d %H:%M:%S %Z"),
            snapshot.exposure.score,
            snapshot.exposure.label,
            snapshot.screens.len(),
            snapshot.merged.len(),
            snapshot.overlaps.overlaps(2).len(),
            snapshot.faults.len()
        );
        if snapshot.exposure.kill_switch {
            info!("Kill-switch active: every index at or below its 21EMA band");
        }

        Some(snapshot)
    }

    /// Fetch every configured source concurrently. Results come back in
    /// configured order; a task that dies becomes a transport error.
    async fn fetch_all(&self) -> Vec<(SourceSpec, Result<String, FetchError>)> {
        let mut set = JoinSet::new();
        for (i, spec) in self.cfg.sources.iter().cloned().enumerate() {
            let source = Arc::clone(&self.source);
            set.spawn(async move {
                let result = source.fetch_csv(&spec).await;
                (i, result)
            });
        }

        let mut results: Vec<Option<Result<String, FetchError>>> =
            self.cfg.sources.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((i, result)) => results[i] = Some(result),
                Err(e) => error!("Fetch task failed: {}", e),
            }
        }

        self.cfg
            .sources
            .iter()
            .cloned()
            .zip(results)
            .map(|(spec, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(FetchError::Transport {
                        source_key: spec.key.clone(),
                        message: "fetch task aborted".to_string(),
                    })
                });
                (spec, result)
            })
            .collect()
    }
}
