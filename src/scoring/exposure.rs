use tracing::debug;

use crate::config::ScoringConfig;
use crate::models::{ComponentWarning, ExposureLabel, ExposureScore, Phase, Row, ScoreComponent};
use crate::parsing::fields;
use crate::parsing::normalize::round1;
use crate::scoring::breadth::BreadthSummary;
use crate::scoring::phase::{has_sector_name, sector_phase};

pub const EMA21_FACTOR: &str = "index_ema21";
pub const SMA50_FACTOR: &str = "index_sma50";
pub const AD_RATIO_FACTOR: &str = "ad_ratio_25";
pub const NH_NL_FACTOR: &str = "new_high_low";
pub const ADVANCING_FACTOR: &str = "advancing_pct";
pub const SECTOR_FACTOR: &str = "sector_breadth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaPosition {
    Above,
    Inside,
    Below,
    Unknown,
}

/// Above when the distance exceeds `band`, below at or under `-band`.
pub fn ema_position(distance_pct: Option<f64>, band: f64) -> EmaPosition {
    match distance_pct {
        Some(d) if d > band => EmaPosition::Above,
        Some(d) if d > -band => EmaPosition::Inside,
        Some(_) => EmaPosition::Below,
        None => EmaPosition::Unknown,
    }
}

pub struct ExposureScorer<'a> {
    cfg: &'a ScoringConfig,
}

impl<'a> ExposureScorer<'a> {
    pub fn new(cfg: &'a ScoringConfig) -> Self {
        Self { cfg }
    }

    pub fn score(
        &self,
        indices: &[Row],
        breadth: Option<&BreadthSummary>,
        sectors: &[Row],
    ) -> ExposureScore {
        let empty = BreadthSummary::default();
        let breadth = breadth.unwrap_or(&empty);

        let components = vec![
            self.ema21_component(indices),
            self.sma50_component(indices),
            self.ad_ratio_component(breadth),
            self.nh_nl_component(breadth),
            self.advancing_component(breadth),
            self.sector_component(sectors),
        ];

        let raw = round1(components.iter().map(|c| c.points).sum());
        let kill_switch = components[0].points == 0.0;

        let (score, label) = if kill_switch {
            (0.0, ExposureLabel::RiskOff)
        } else {
            let score = round1(raw.clamp(0.0, 100.0));
            (score, ExposureLabel::from_score(score))
        };

        debug!(
            "Exposure raw={:.1} score={:.1} label={} kill_switch={}",
            raw, score, label, kill_switch
        );

        ExposureScore {
            score,
            raw,
            label,
            kill_switch,
            components,
        }
    }

    fn per_index_share(&self, weight: f64) -> f64 {
        weight / self.cfg.index_count.max(1) as f64
    }

    fn ema21_component(&self, indices: &[Row]) -> ScoreComponent {
        let weight = self.cfg.weights.ema21;
        let full = self.per_index_share(weight);
        let half = full / 2.0;

        let points: f64 = indices
            .iter()
            .map(|r| match ema_position(fields::EMA21_DIST.number(r), self.cfg.ema_band) {
                EmaPosition::Above => full,
                EmaPosition::Inside => half,
                EmaPosition::Below | EmaPosition::Unknown => 0.0,
            })
            .sum();

        // Extra scorecard rows beyond index_count never push past the weight.
        component(EMA21_FACTOR, points.min(weight), weight, None)
    }

    fn sma50_component(&self, indices: &[Row]) -> ScoreComponent {
        let weight = self.cfg.weights.sma50;
        let above = indices
            .iter()
            .filter(|r| fields::SMA50_DIST.number(r).is_some_and(|d| d > 0.0))
            .count();
        let points = above as f64 * self.per_index_share(weight);
        component(SMA50_FACTOR, points.min(weight), weight, None)
    }

    fn ad_ratio_component(&self, breadth: &BreadthSummary) -> ScoreComponent {
        let weight = self.cfg.weights.ad_ratio;
        let ladder = &self.cfg.ad_ratio;

        let bucket = breadth
            .toraku_ratio_25
            .and_then(|ratio| ladder.buckets.iter().find(|b| b.contains(ratio)));

        let points = bucket.map_or(ladder.fallback_points, |b| b.points).min(weight);
        let warning = match (bucket, breadth.toraku_ratio_25) {
            (Some(b), Some(ratio)) => b.warning.map(|severity| ComponentWarning {
                severity,
                label: format!("A/D ratio {} ({:.1})", b.name, ratio),
            }),
            _ => None,
        };

        component(AD_RATIO_FACTOR, points, weight, warning)
    }

    fn nh_nl_component(&self, breadth: &BreadthSummary) -> ScoreComponent {
        let weight = self.cfg.weights.nh_nl;
        let tiers = &self.cfg.nh_nl;
        let highs = breadth.new_high_count.unwrap_or(0.0);
        let lows = breadth.new_low_count.unwrap_or(0.0);

        let total = highs + lows;
        let base = if total > 0.0 {
            highs / total * (weight - tiers.bonus_ceiling())
        } else {
            0.0
        };
        let bonus = if highs >= 100.0 {
            tiers.bonus_100
        } else if highs >= 50.0 {
            tiers.bonus_50
        } else {
            0.0
        };

        component(NH_NL_FACTOR, (base + bonus).min(weight), weight, None)
    }

    fn advancing_component(&self, breadth: &BreadthSummary) -> ScoreComponent {
        let weight = self.cfg.weights.advancing;
        let points = breadth
            .advancing_pct
            .and_then(|pct| self.cfg.advancing.iter().find(|t| pct >= t.at_least))
            .map_or(0.0, |t| t.points);
        component(ADVANCING_FACTOR, points, weight, None)
    }

    fn sector_component(&self, sectors: &[Row]) -> ScoreComponent {
        let weight = self.cfg.weights.sector;
        let bonus_cfg = &self.cfg.sector;

        let named: Vec<&Row> = sectors.iter().filter(|r| has_sector_name(r)).collect();
        if named.is_empty() {
            return component(SECTOR_FACTOR, 0.0, weight, None);
        }

        let leading = named
            .iter()
            .filter(|r| sector_phase(r, &self.cfg.phase) == Phase::Leading)
            .count();
        let base = leading as f64 / named.len() as f64 * (weight - bonus_cfg.bonus);

        let bands: Vec<f64> = named.iter().filter_map(|r| fields::BAND_80.number(r)).collect();
        let bonus = if !bands.is_empty()
            && bands.iter().sum::<f64>() / bands.len() as f64 >= bonus_cfg.band80_threshold
        {
            bonus_cfg.bonus
        } else {
            0.0
        };

        component(SECTOR_FACTOR, (base + bonus).min(weight), weight, None)
    }
}

fn component(
    name: &'static str,
    points: f64,
    max_points: f64,
    warning: Option<ComponentWarning>,
) -> ScoreComponent {
    ScoreComponent {
        name,
        points: round1(points),
        max_points,
        warning,
    }
}

pub fn compute_exposure(
    indices: &[Row],
    breadth: Option<&BreadthSummary>,
    sectors: &[Row],
    cfg: &ScoringConfig,
) -> ExposureScore {
    ExposureScorer::new(cfg).score(indices, breadth, sectors)
}
