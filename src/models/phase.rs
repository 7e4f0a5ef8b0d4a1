use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal sector-momentum phase, 1 (lagging) to 4 (leading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    Lagging = 1,
    Stalling = 2,
    Improving = 3,
    Leading = 4,
}

impl Phase {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Lagging => "Lagging",
            Phase::Stalling => "Stalling",
            Phase::Improving => "Improving",
            Phase::Leading => "Leading",
        }
    }
}

impl From<Phase> for u8 {
    fn from(p: Phase) -> u8 {
        p.as_u8()
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Phase::Lagging),
            2 => Ok(Phase::Stalling),
            3 => Ok(Phase::Improving),
            4 => Ok(Phase::Leading),
            other => Err(format!("invalid phase {}", other)),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u8(), self.label())
    }
}
