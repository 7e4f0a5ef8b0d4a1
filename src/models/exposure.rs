use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExposureLabel {
    Aggressive,
    Bullish,
    Cautious,
    Defensive,
    RiskOff,
}

impl ExposureLabel {
    /// Thresholds apply to the displayed (clamped, rounded) score.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ExposureLabel::Aggressive
        } else if score >= 60.0 {
            ExposureLabel::Bullish
        } else if score >= 40.0 {
            ExposureLabel::Cautious
        } else if score >= 20.0 {
            ExposureLabel::Defensive
        } else {
            ExposureLabel::RiskOff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureLabel::Aggressive => "AGGRESSIVE",
            ExposureLabel::Bullish => "BULLISH",
            ExposureLabel::Cautious => "CAUTIOUS",
            ExposureLabel::Defensive => "DEFENSIVE",
            ExposureLabel::RiskOff => "RISK_OFF",
        }
    }
}

impl fmt::Display for ExposureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Danger => write!(f, "danger"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentWarning {
    pub severity: Severity,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub points: f64,
    pub max_points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ComponentWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureScore {
    /// Displayed score: 0 under the kill-switch, else min(100, raw) at one decimal.
    pub score: f64,
    /// Unclamped sum of the rounded components.
    pub raw: f64,
    pub label: ExposureLabel,
    pub kill_switch: bool,
    pub components: Vec<ScoreComponent>,
}

impl ExposureScore {
    pub fn component(&self, name: &str) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds() {
        assert_eq!(ExposureLabel::from_score(80.0), ExposureLabel::Aggressive);
        assert_eq!(ExposureLabel::from_score(79.9), ExposureLabel::Bullish);
        assert_eq!(ExposureLabel::from_score(60.0), ExposureLabel::Bullish);
        assert_eq!(ExposureLabel::from_score(40.0), ExposureLabel::Cautious);
        assert_eq!(ExposureLabel::from_score(20.0), ExposureLabel::Defensive);
        assert_eq!(ExposureLabel::from_score(19.9), ExposureLabel::RiskOff);
    }

    #[test]
    fn label_serializes_screaming() {
        let json = serde_json::to_string(&ExposureLabel::RiskOff).unwrap();
        assert_eq!(json, "\"RISK_OFF\"");
    }
}
