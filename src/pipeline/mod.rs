pub mod dashboard;
pub mod snapshot;

pub use dashboard::Dashboard;
pub use snapshot::{build_snapshot, SectorView, Snapshot};
