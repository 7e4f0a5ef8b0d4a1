use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Config, EntryCriteria, SourceKind, SourceSpec};
use crate::models::{ExposureScore, Phase, Portfolio, Row, Table};
use crate::parsing::{parse_portfolio, parse_table};
use crate::scoring::phase::has_sector_name;
use crate::scoring::{compute_exposure, scorecard_table, sector_phase, BreadthSummary};
use crate::screener::{
    apply_view, reconcile, slice_history, MergePolicy, Reconciliation, SortContext, ViewState,
    ALL_SCREENS,
};
use crate::sources::{FetchError, SourceFault};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorView {
    pub row: Row,
    pub phase: Phase,
}

/// Everything one refresh cycle hands to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub scorecard: Table,
    pub breadth: Option<BreadthSummary>,
    pub exposure: ExposureScore,
    pub sectors: Vec<SectorView>,
    /// Per-screen tables in configured order.
    pub screens: Vec<(String, Table)>,
    /// First-seen rows, for overlap display.
    pub overlaps: Reconciliation,
    /// Fill-empty merge, backing the ALL view.
    pub merged: Reconciliation,
    pub portfolio: Option<Portfolio>,
    pub history: Table,
    pub faults: Vec<SourceFault>,
    #[serde(skip)]
    entry: EntryCriteria,
}

impl Snapshot {
    pub fn screen(&self, key: &str) -> Option<&Table> {
        self.screens.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn fault_for(&self, key: &str) -> Option<&SourceFault> {
        self.faults.iter().find(|f| f.key == key)
    }

    pub fn screen_keys(&self) -> Vec<String> {
        self.screens.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Filtered, sorted rows for the selected screen, or for the same
    /// screen rebuilt from history when a date is selected.
    pub fn screen_view(&self, state: &ViewState) -> Vec<Row> {
        let keys = self.screen_keys();
        let historical;
        let (screens, merged) = match &state.date {
            Some(date) => {
                let sliced = slice_history(&self.history, date, &keys);
                let merged = reconcile(&sliced, MergePolicy::FillEmpty);
                historical = (sliced, merged);
                (&historical.0, &historical.1)
            }
            None => (&self.screens, &self.merged),
        };

        let ctx = SortContext {
            reconciled: Some(merged),
            criteria: &self.entry,
        };

        if state.screen == ALL_SCREENS {
            return apply_view(&merged.to_table().rows, state, &ctx);
        }
        match screens.iter().find(|(k, _)| *k == state.screen) {
            Some((_, table)) => apply_view(&table.rows, state, &ctx),
            None => {
                debug!("Unknown screen {:?}", state.screen);
                Vec::new()
            }
        }
    }
}

/// Successful bodies go through; failures become empty input plus a fault.
fn take_body(
    spec: &SourceSpec,
    result: Result<String, FetchError>,
    faults: &mut Vec<SourceFault>,
) -> Option<String> {
    match result {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Source {} unavailable: {}", spec.key, e);
            faults.push(SourceFault::from_error(&spec.key, &e));
            None
        }
    }
}

/// Build a snapshot from per-source fetch results. Each view is derived
/// only from its own sources, so one missing source leaves the rest intact.
pub fn build_snapshot(
    cfg: &Config,
    fetched: Vec<(SourceSpec, Result<String, FetchError>)>,
) -> Snapshot {
    let mut faults = Vec::new();
    let mut index_sheet = Table::default();
    let mut sector_sheet = Table::default();
    let mut screens: Vec<(String, Table)> = Vec::new();
    let mut portfolio = None;
    let mut history = Table::default();

    for (spec, result) in fetched {
        let body = take_body(&spec, result, &mut faults);
        match spec.kind {
            SourceKind::Indices => index_sheet = body.as_deref().map(parse_table).unwrap_or_default(),
            SourceKind::Sectors => sector_sheet = body.as_deref().map(parse_table).unwrap_or_default(),
            SourceKind::Screen => {
                let table = body.as_deref().map(parse_table).unwrap_or_default();
                screens.push((spec.key.clone(), table));
            }
            SourceKind::Portfolio => portfolio = body.as_deref().map(parse_portfolio),
            SourceKind::History => history = body.as_deref().map(parse_table).unwrap_or_default(),
        }
    }

    let scorecard = scorecard_table(&index_sheet);
    let breadth = BreadthSummary::from_rows(&index_sheet.rows);
    let exposure = compute_exposure(&scorecard.rows, breadth.as_ref(), &sector_sheet.rows, &cfg.scoring);

    let sectors = sector_sheet
        .iter()
        .filter(|r| has_sector_name(r))
        .map(|r| SectorView {
            row: r.clone(),
            phase: sector_phase(r, &cfg.scoring.phase),
        })
        .collect();

    let overlaps = reconcile(&screens, MergePolicy::FirstSeen);
    let merged = reconcile(&screens, MergePolicy::FillEmpty);

    Snapshot {
        fetched_at: Utc::now(),
        scorecard,
        breadth,
        exposure,
        sectors,
        screens,
        overlaps,
        merged,
        portfolio,
        history,
        faults,
        entry: cfg.entry.clone(),
    }
}
