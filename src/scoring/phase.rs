use crate::config::PhaseThresholds;
use crate::models::{Phase, Row};
use crate::parsing::fields;

/// Classify from 21-day RS and 1-week earnings revision. Total: every
/// input pair maps to exactly one phase.
pub fn derive_phase(rs: f64, revision: f64, t: &PhaseThresholds) -> Phase {
    if rs >= t.strong && revision > 0.0 {
        Phase::Leading
    } else if revision > 0.0 && rs >= t.improving {
        Phase::Improving
    } else if revision <= 0.0 && rs >= t.stalling {
        Phase::Stalling
    } else {
        Phase::Lagging
    }
}

/// Phase of a sector row; missing RS and revision use the neutral defaults.
pub fn sector_phase(row: &Row, t: &PhaseThresholds) -> Phase {
    let rs = fields::RS_21.number(row).unwrap_or(t.default_rs);
    let revision = fields::ER_WEEKLY.number(row).unwrap_or(t.default_revision);
    derive_phase(rs, revision, t)
}

pub fn has_sector_name(row: &Row) -> bool {
    fields::SECTOR.text(row).is_some_and(|s| !s.is_empty())
}
