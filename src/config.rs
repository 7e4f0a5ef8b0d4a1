use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::models::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Indices,
    Sectors,
    Screen,
    Portfolio,
    History,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Indices => write!(f, "indices"),
            SourceKind::Sectors => write!(f, "sectors"),
            SourceKind::Screen => write!(f, "screen"),
            SourceKind::Portfolio => write!(f, "portfolio"),
            SourceKind::History => write!(f, "history"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub key: String,
    pub kind: SourceKind,
    pub gid: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl SourceSpec {
    pub fn new(key: &str, kind: SourceKind, gid: &str) -> Self {
        Self {
            key: key.to_string(),
            kind,
            gid: gid.to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureWeights {
    pub ema21: f64,
    pub sma50: f64,
    pub ad_ratio: f64,
    pub nh_nl: f64,
    pub advancing: f64,
    pub sector: f64,
}

impl Default for ExposureWeights {
    fn default() -> Self {
        Self {
            ema21: 35.0,
            sma50: 10.0,
            ad_ratio: 17.0,
            nh_nl: 13.0,
            advancing: 10.0,
            sector: 15.0,
        }
    }
}

/// One step of the advance/decline ratio ladder. Values at or above
/// `lower` (strictly above when `inclusive` is false) land here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRatioBucket {
    pub name: String,
    pub lower: f64,
    #[serde(default = "default_true")]
    pub inclusive: bool,
    pub points: f64,
    #[serde(default)]
    pub warning: Option<Severity>,
}

impl AdRatioBucket {
    fn new(name: &str, lower: f64, inclusive: bool, points: f64, warning: Option<Severity>) -> Self {
        Self {
            name: name.to_string(),
            lower,
            inclusive,
            points,
            warning,
        }
    }

    pub fn contains(&self, ratio: f64) -> bool {
        if self.inclusive {
            ratio >= self.lower
        } else {
            ratio > self.lower
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdRatioConfig {
    /// Checked top-down; the first matching bucket wins.
    pub buckets: Vec<AdRatioBucket>,
    /// Used below every bucket, and when the ratio is missing.
    pub fallback_points: f64,
}

impl Default for AdRatioConfig {
    fn default() -> Self {
        Self {
            buckets: vec![
                AdRatioBucket::new("extreme", 140.0, false, 0.0, Some(Severity::Danger)),
                AdRatioBucket::new("overheat", 120.0, false, 8.0, Some(Severity::Warning)),
                AdRatioBucket::new("optimal", 100.0, true, 17.0, None),
                AdRatioBucket::new("warm", 80.0, true, 12.0, None),
                AdRatioBucket::new("cool", 70.0, true, 7.0, None),
            ],
            fallback_points: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub at_least: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NhNlConfig {
    pub bonus_100: f64,
    pub bonus_50: f64,
}

impl Default for NhNlConfig {
    fn default() -> Self {
        Self {
            bonus_100: 3.0,
            bonus_50: 2.0,
        }
    }
}

impl NhNlConfig {
    pub fn bonus_ceiling(&self) -> f64 {
        self.bonus_100.max(self.bonus_50)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorBreadthConfig {
    pub bonus: f64,
    pub band80_threshold: f64,
}

impl Default for SectorBreadthConfig {
    fn default() -> Self {
        Self {
            bonus: 3.0,
            band80_threshold: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    pub strong: f64,
    pub improving: f64,
    pub stalling: f64,
    pub default_rs: f64,
    pub default_revision: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            strong: 50.0,
            improving: 30.0,
            stalling: 30.0,
            default_rs: 50.0,
            default_revision: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ExposureWeights,
    /// Half-width of the "inside" band around the 21EMA, in percent.
    pub ema_band: f64,
    /// Fixed number of tracked indices used to split the EMA/SMA weights.
    pub index_count: usize,
    pub ad_ratio: AdRatioConfig,
    pub nh_nl: NhNlConfig,
    pub advancing: Vec<Threshold>,
    pub sector: SectorBreadthConfig,
    pub phase: PhaseThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ExposureWeights::default(),
            ema_band: 1.0,
            index_count: 3,
            ad_ratio: AdRatioConfig::default(),
            nh_nl: NhNlConfig::default(),
            advancing: vec![
                Threshold { at_least: 55.0, points: 10.0 },
                Threshold { at_least: 45.0, points: 7.0 },
                Threshold { at_least: 35.0, points: 4.0 },
            ],
            sector: SectorBreadthConfig::default(),
            phase: PhaseThresholds::default(),
        }
    }
}

/// Contents of the `SCORING_CONFIG` file: scoring fields at the top level,
/// entry criteria under `entry`. Anything omitted keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TuningFile {
    #[serde(flatten)]
    pub scoring: ScoringConfig,
    pub entry: EntryCriteria,
}

impl TuningFile {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid scoring config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("In {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryCriteria {
    pub adr_pct: Range,
    pub ema21_atr_multiple: Range,
    pub sma50_pct_max: f64,
    pub sma50_atr_max: f64,
    pub highlight_threshold: u8,
}

impl Default for EntryCriteria {
    fn default() -> Self {
        Self {
            adr_pct: Range { min: 4.0, max: 10.0 },
            ema21_atr_multiple: Range { min: -0.5, max: 1.0 },
            sma50_pct_max: 20.0,
            sma50_atr_max: 5.0,
            highlight_threshold: 3,
        }
    }
}

impl EntryCriteria {
    /// Highlighting below two satisfied checks is never allowed.
    pub fn effective_threshold(&self) -> u8 {
        self.highlight_threshold.max(2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Sources
    pub sheet_base_url: String,
    pub sources: Vec<SourceSpec>,

    // Refresh
    pub refresh_interval_secs: u64,
    pub request_timeout_secs: u64,

    // Scoring
    pub tuning_path: Option<PathBuf>,
    pub scoring: ScoringConfig,
    pub entry: EntryCriteria,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let mut sources = default_sources();
        for spec in &mut sources {
            let var = format!("SHEET_URL_{}", spec.key.to_uppercase());
            spec.url = std::env::var(var).ok();
            if let Ok(gid) = std::env::var(format!("SHEET_GID_{}", spec.key.to_uppercase())) {
                spec.gid = gid;
            }
        }

        Config {
            sheet_base_url: env("SHEET_BASE_URL", ""),
            sources,
            refresh_interval_secs: env("REFRESH_INTERVAL_SECS", "300").parse().unwrap_or(300),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS", "20").parse().unwrap_or(20),
            tuning_path: std::env::var("SCORING_CONFIG").ok().map(PathBuf::from),
            scoring: ScoringConfig::default(),
            entry: EntryCriteria::default(),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Apply the `SCORING_CONFIG` file, if one is set. On error the current
    /// scoring and entry settings are left untouched.
    pub fn load_tuning(&mut self) -> Result<()> {
        let Some(path) = &self.tuning_path else {
            return Ok(());
        };
        let tuning = TuningFile::from_json_file(path)?;
        self.scoring = tuning.scoring;
        self.entry = tuning.entry;
        Ok(())
    }

    pub fn source_url(&self, spec: &SourceSpec) -> String {
        match &spec.url {
            Some(url) => url.clone(),
            None => format!("{}&gid={}", self.sheet_base_url, spec.gid),
        }
    }
}

pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::new("Indices", SourceKind::Indices, "0"),
        SourceSpec::new("Sectors", SourceKind::Sectors, "1"),
        SourceSpec::new("Momentum", SourceKind::Screen, "2"),
        SourceSpec::new("Breakout", SourceKind::Screen, "3"),
        SourceSpec::new("Pullback", SourceKind::Screen, "4"),
        SourceSpec::new("Earnings", SourceKind::Screen, "5"),
        SourceSpec::new("Portfolio", SourceKind::Portfolio, "6"),
        SourceSpec::new("History", SourceKind::History, "7"),
    ]
}
