pub mod cell;
pub mod exposure;
pub mod phase;
pub mod portfolio;

pub use cell::{CellValue, Row, Table};
pub use exposure::*;
pub use phase::Phase;
pub use portfolio::{Portfolio, PortfolioSection};
