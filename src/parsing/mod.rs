pub mod aliases;
pub mod csv;
pub mod normalize;
pub mod sections;
pub mod table;

pub use aliases::{fields, FieldAlias};
pub use normalize::{is_percent_string, parse_locale_number, short_date_label};
pub use sections::parse_portfolio;
pub use table::parse_table;
