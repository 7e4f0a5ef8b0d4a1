use serde::Serialize;

use crate::models::{Row, Table};
use crate::parsing::fields;

/// The index sheet carries two logical tables. Scorecard rows name an index
/// and its price; breadth rows have no name but carry advances/declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRowKind {
    Scorecard,
    Breadth,
    Other,
}

pub fn classify_index_row(row: &Row) -> IndexRowKind {
    let named = fields::INDEX_NAME.is_present(row);
    if named && fields::PRICE.is_present(row) {
        IndexRowKind::Scorecard
    } else if !named && (fields::ADVANCES.is_present(row) || fields::DECLINES.is_present(row)) {
        IndexRowKind::Breadth
    } else {
        IndexRowKind::Other
    }
}

pub fn scorecard_table(sheet: &Table) -> Table {
    let rows = sheet
        .iter()
        .filter(|r| classify_index_row(r) == IndexRowKind::Scorecard)
        .cloned()
        .collect();
    Table::new(sheet.headers.clone(), rows)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreadthSummary {
    pub toraku_ratio_25: Option<f64>,
    pub toraku_ratio_10: Option<f64>,
    pub new_high_count: Option<f64>,
    pub new_low_count: Option<f64>,
    pub advancing_pct: Option<f64>,
    pub advancing_count: Option<f64>,
    pub declining_count: Option<f64>,
}

impl BreadthSummary {
    pub fn from_row(row: &Row) -> Self {
        let advancing_count = fields::ADVANCES.number(row);
        let declining_count = fields::DECLINES.number(row);
        let advancing_pct = fields::ADVANCING_PCT.number(row).or_else(|| {
            match (advancing_count, declining_count) {
                (Some(a), Some(d)) if a + d > 0.0 => Some(a / (a + d) * 100.0),
                _ => None,
            }
        });

        Self {
            toraku_ratio_25: fields::TORAKU_25.number(row),
            toraku_ratio_10: fields::TORAKU_10.number(row),
            new_high_count: fields::NEW_HIGHS.number(row),
            new_low_count: fields::NEW_LOWS.number(row),
            advancing_pct,
            advancing_count,
            declining_count,
        }
    }

    /// Summary of the most recent (last in sheet order) breadth row.
    pub fn from_rows(rows: &[Row]) -> Option<Self> {
        rows.iter()
            .rev()
            .find(|r| classify_index_row(r) == IndexRowKind::Breadth)
            .map(Self::from_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;
    use crate::parsing::parse_table;

    const SHEET: &str = "\
Name,Price,21EMA(%),50SMA(%),Date,Advances,Declines,騰落25,騰落10,NH,NL
Nikkei 225,38000,1.5,3.2,,,,,,,
TOPIX,2700,-0.4,1.1,,,,,,,
Growth 250,640,-2.0,-5.0,,,,,,,
,,,,2024-03-06,900,700,105,98,60,10
,,,,2024-03-07,1000,600,112.5,101,120,8
";

    #[test]
    fn predicate_separates_embedded_tables() {
        let t = parse_table(SHEET);
        let kinds: Vec<_> = t.iter().map(classify_index_row).collect();
        assert_eq!(
            kinds,
            vec![
                IndexRowKind::Scorecard,
                IndexRowKind::Scorecard,
                IndexRowKind::Scorecard,
                IndexRowKind::Breadth,
                IndexRowKind::Breadth,
            ]
        );
        assert_eq!(scorecard_table(&t).len(), 3);
    }

    #[test]
    fn named_row_without_price_is_other() {
        let row = Row::from_pairs([("Name", CellValue::text("Mothers"))]);
        assert_eq!(classify_index_row(&row), IndexRowKind::Other);
    }

    #[test]
    fn summary_uses_latest_breadth_row() {
        let t = parse_table(SHEET);
        let b = BreadthSummary::from_rows(&t.rows).unwrap();
        assert_eq!(b.toraku_ratio_25, Some(112.5));
        assert_eq!(b.new_high_count, Some(120.0));
        assert_eq!(b.new_low_count, Some(8.0));
        assert_eq!(b.advancing_count, Some(1000.0));
        assert_eq!(b.advancing_pct, Some(62.5));
    }

    #[test]
    fn no_breadth_rows_gives_none() {
        let t = parse_table("Name,Price\nTOPIX,2700\n");
        assert!(BreadthSummary::from_rows(&t.rows).is_none());
    }
}
