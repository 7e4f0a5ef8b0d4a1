use serde::Serialize;
use std::fmt;

use super::{Row, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioSection {
    Risk,
    Entry,
    Positions,
    History,
    Stats,
}

impl fmt::Display for PortfolioSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioSection::Risk => write!(f, "risk"),
            PortfolioSection::Entry => write!(f, "entry"),
            PortfolioSection::Positions => write!(f, "positions"),
            PortfolioSection::History => write!(f, "history"),
            PortfolioSection::Stats => write!(f, "stats"),
        }
    }
}

/// Interpreted portfolio sheet. `risk` and `stats` are flat key-value
/// mappings stored as a single ordered row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Portfolio {
    pub risk: Row,
    pub entry: Table,
    pub positions: Table,
    pub history: Table,
    pub stats: Row,
}
