pub mod breadth;
pub mod exposure;
pub mod phase;

pub use breadth::{classify_index_row, scorecard_table, BreadthSummary, IndexRowKind};
pub use exposure::{compute_exposure, ExposureScorer};
pub use phase::{derive_phase, sector_phase};
