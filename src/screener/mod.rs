pub mod entry;
pub mod history;
pub mod reconcile;
pub mod ticker;
pub mod view;

pub use entry::{entry_score, EntryScore};
pub use history::{history_dates, slice_history};
pub use reconcile::{reconcile, MergePolicy, OverlapEntry, Reconciliation};
pub use ticker::{row_ticker, ticker_identity};
pub use view::{apply_view, DefaultSort, SortContext, SortDirection, ViewState, ALL_SCREENS};
