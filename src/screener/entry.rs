use serde::Serialize;

use crate::config::EntryCriteria;
use crate::models::Row;
use crate::parsing::fields;

/// Entry-readiness: how many of the four range checks a row satisfies.
/// A missing metric fails only its own check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryScore {
    pub satisfied: u8,
    /// ADR%, 21EMA ATR multiple, 50SMA distance %, 50SMA ATR multiple.
    pub checks: [bool; 4],
}

impl EntryScore {
    pub fn is_highlight(&self, criteria: &EntryCriteria) -> bool {
        self.satisfied >= criteria.effective_threshold()
    }
}

pub fn entry_score(row: &Row, criteria: &EntryCriteria) -> EntryScore {
    let checks = [
        fields::ADR_PCT
            .number(row)
            .is_some_and(|v| criteria.adr_pct.contains(v)),
        fields::EMA21_ATR
            .number(row)
            .is_some_and(|v| criteria.ema21_atr_multiple.contains(v)),
        fields::SMA50_PCT
            .number(row)
            .is_some_and(|v| v <= criteria.sma50_pct_max),
        fields::SMA50_ATR
            .number(row)
            .is_some_and(|v| v <= criteria.sma50_atr_max),
    ];
    EntryScore {
        satisfied: checks.iter().filter(|&&c| c).count() as u8,
        checks,
    }
}
