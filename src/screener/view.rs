//! Filter and sort over screener rows.
//!
//! All UI selections live in an immutable [`ViewState`]; every interaction
//! returns a new value instead of mutating shared state.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::EntryCriteria;
use crate::models::Row;
use crate::parsing::fields;
use crate::screener::entry::entry_score;
use crate::screener::reconcile::Reconciliation;
use crate::screener::ticker::row_ticker;

/// Screen key selecting the deduplicated union of every screen.
pub const ALL_SCREENS: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub column: String,
    pub direction: SortDirection,
}

/// Named ordering used when no column sort is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSort {
    SourceOrder,
    OverlapCount,
    EntryScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub screen: String,
    pub date: Option<String>,
    pub sector: Option<String>,
    pub search: String,
    pub sort: Option<ColumnSort>,
    pub default_sort: DefaultSort,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: ALL_SCREENS.to_string(),
            date: None,
            sector: None,
            search: String::new(),
            sort: None,
            default_sort: DefaultSort::SourceOrder,
        }
    }
}

impl ViewState {
    pub fn new(screen: &str) -> Self {
        Self {
            screen: screen.to_string(),
            ..Self::default()
        }
    }

    pub fn with_screen(&self, screen: &str) -> Self {
        Self {
            screen: screen.to_string(),
            ..self.clone()
        }
    }

    pub fn with_date(&self, date: Option<&str>) -> Self {
        Self {
            date: date.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn with_sector(&self, sector: Option<&str>) -> Self {
        Self {
            sector: sector.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn with_search(&self, search: &str) -> Self {
        Self {
            search: search.to_string(),
            ..self.clone()
        }
    }

    pub fn with_default_sort(&self, default_sort: DefaultSort) -> Self {
        Self {
            default_sort,
            ..self.clone()
        }
    }

    /// Same column flips direction; a new column starts descending.
    pub fn toggle_sort(&self, column: &str) -> Self {
        let direction = match &self.sort {
            Some(s) if s.column == column => s.direction.reversed(),
            _ => SortDirection::Desc,
        };
        Self {
            sort: Some(ColumnSort {
                column: column.to_string(),
                direction,
            }),
            ..self.clone()
        }
    }
}

/// Lookups the default sorts need beyond the rows themselves.
pub struct SortContext<'a> {
    pub reconciled: Option<&'a Reconciliation>,
    pub criteria: &'a EntryCriteria,
}

pub fn is_text_column(column: &str) -> bool {
    fields::TEXT_COLUMNS.iter().any(|alias| alias.matches(column))
}

/// Case-folded comparison with a raw tiebreak, so "abc" and "ABC" sit
/// together but still order deterministically.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Missing values sort after present ones in both directions.
pub fn compare_nan_last(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

pub fn compare_by_column(a: &Row, b: &Row, sort: &ColumnSort) -> Ordering {
    if is_text_column(&sort.column) {
        let text = |r: &Row| r.get(&sort.column).map(|v| v.display()).unwrap_or_default();
        let ord = locale_compare(&text(a), &text(b));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    } else {
        let num = |r: &Row| r.get(&sort.column).and_then(|v| v.as_number());
        compare_nan_last(num(a), num(b), sort.direction)
    }
}

fn matches_search(row: &Row, needle: &str) -> bool {
    let haystacks = [
        row_ticker(row),
        fields::STOCK_NAME.text(row),
        fields::SECTOR.text(row),
    ];
    haystacks
        .iter()
        .flatten()
        .any(|h| h.to_lowercase().contains(needle))
}

/// Sector filter, then search, then sort. Sorting is stable.
pub fn apply_view(rows: &[Row], state: &ViewState, ctx: &SortContext) -> Vec<Row> {
    let needle = state.search.trim().to_lowercase();

    let mut out: Vec<Row> = rows
        .iter()
        .filter(|r| match &state.sector {
            Some(sector) => fields::SECTOR.text(r).as_deref() == Some(sector.as_str()),
            None => true,
        })
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .cloned()
        .collect();

    match (&state.sort, state.default_sort) {
        (Some(sort), _) => out.sort_by(|a, b| compare_by_column(a, b, sort)),
        (None, DefaultSort::SourceOrder) => {}
        (None, DefaultSort::OverlapCount) => {
            if let Some(rec) = ctx.reconciled {
                out.sort_by_key(|r| std::cmp::Reverse(row_ticker(r).map_or(0, |t| rec.count_for(&t))));
            }
        }
        (None, DefaultSort::EntryScore) => {
            out.sort_by_key(|r| std::cmp::Reverse(entry_score(r, ctx.criteria).satisfied));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Table};
    use crate::screener::reconcile::{reconcile, MergePolicy};

    fn v_rows(values: &[Option<f64>]) -> Vec<Row> {
        values
            .iter()
            .map(|v| Row::from_pairs([("v", v.map_or(CellValue::Null, CellValue::Number))]))
            .collect()
    }

    fn values(rows: &[Row]) -> Vec<Option<f64>> {
        rows.iter().map(|r| r.number("v")).collect()
    }

    fn stock(ticker: &str, name: &str, sector: &str, rs: f64) -> Row {
        Row::from_pairs([
            ("Ticker", CellValue::text(ticker)),
            ("Name", CellValue::text(name)),
            ("Sector", CellValue::text(sector)),
            ("RS", CellValue::Number(rs)),
        ])
    }

    #[test]
    fn nan_last_in_both_directions() {
        let rows = v_rows(&[Some(3.0), None, Some(1.0)]);
        let criteria = EntryCriteria::default();
        let ctx = SortContext { reconciled: None, criteria: &criteria };

        let asc = ViewState::default().toggle_sort("v").toggle_sort("v");
        assert_eq!(asc.sort.as_ref().unwrap().direction, SortDirection::Asc);
        assert_eq!(values(&apply_view(&rows, &asc, &ctx)), vec![Some(1.0), Some(3.0), None]);

        let desc = ViewState::default().toggle_sort("v");
        assert_eq!(values(&apply_view(&rows, &desc, &ctx)), vec![Some(3.0), Some(1.0), None]);
    }

    #[test]
    fn toggle_semantics() {
        let s = ViewState::default().toggle_sort("RS");
        assert_eq!(s.sort.as_ref().unwrap().direction, SortDirection::Desc);
        let s = s.toggle_sort("RS");
        assert_eq!(s.sort.as_ref().unwrap().direction, SortDirection::Asc);
        let s = s.toggle_sort("ADR%");
        assert_eq!(s.sort.as_ref().unwrap().column, "ADR%");
        assert_eq!(s.sort.as_ref().unwrap().direction, SortDirection::Desc);
    }

    #[test]
    fn transitions_do_not_mutate_the_original() {
        let base = ViewState::new("Momentum");
        let next = base.with_search("toyota").with_sector(Some("輸送用機器"));
        assert_eq!(base.search, "");
        assert_eq!(base.sector, None);
        assert_eq!(next.screen, "Momentum");
        assert_eq!(next.sector.as_deref(), Some("輸送用機器"));
    }

    #[test]
    fn sector_then_search() {
        let rows = vec![
            stock("7203", "Toyota", "輸送用機器", 80.0),
            stock("7267", "Honda", "輸送用機器", 60.0),
            stock("6758", "Sony", "電気機器", 90.0),
        ];
        let criteria = EntryCriteria::default();
        let ctx = SortContext { reconciled: None, criteria: &criteria };

        let s = ViewState::default().with_sector(Some("輸送用機器"));
        assert_eq!(apply_view(&rows, &s, &ctx).len(), 2);

        let s = s.with_search("HON");
        let out = apply_view(&rows, &s, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("Name"), Some(&CellValue::text("Honda")));

        let s = ViewState::default().with_search("電気");
        assert_eq!(apply_view(&rows, &s, &ctx).len(), 1);
        let s = ViewState::default().with_search("6758");
        assert_eq!(apply_view(&rows, &s, &ctx).len(), 1);
    }

    #[test]
    fn text_columns_compare_as_strings() {
        let rows = vec![
            stock("9", "beta", "x", 1.0),
            stock("10", "Alpha", "x", 2.0),
            stock("2", "alpha", "x", 3.0),
        ];
        let criteria = EntryCriteria::default();
        let ctx = SortContext { reconciled: None, criteria: &criteria };

        let s = ViewState::default().toggle_sort("Ticker").toggle_sort("Ticker");
        let tickers: Vec<String> = apply_view(&rows, &s, &ctx)
            .iter()
            .map(|r| r.get("Ticker").unwrap().display())
            .collect();
        assert_eq!(tickers, vec!["10", "2", "9"]);

        let s = ViewState::default().toggle_sort("Name").toggle_sort("Name");
        let names: Vec<String> = apply_view(&rows, &s, &ctx)
            .iter()
            .map(|r| r.get("Name").unwrap().display())
            .collect();
        assert_eq!(names, vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn column_sort_overrides_default_sort() {
        let rows = vec![stock("1", "a", "x", 10.0), stock("2", "b", "x", 20.0)];
        let criteria = EntryCriteria::default();
        let ctx = SortContext { reconciled: None, criteria: &criteria };
        let s = ViewState::default()
            .with_default_sort(DefaultSort::EntryScore)
            .toggle_sort("RS");
        let out = apply_view(&rows, &s, &ctx);
        assert_eq!(out[0].number("RS"), Some(20.0));
    }

    #[test]
    fn overlap_default_sort() {
        let a = Table::new(
            vec!["Ticker".into()],
            vec![Row::from_pairs([("Ticker", CellValue::text("1"))])],
        );
        let b = Table::new(
            vec!["Ticker".into()],
            vec![
                Row::from_pairs([("Ticker", CellValue::text("2"))]),
                Row::from_pairs([("Ticker", CellValue::text("1"))]),
            ],
        );
        let rec = reconcile(&[("A".into(), a), ("B".into(), b.clone())], MergePolicy::FirstSeen);
        let criteria = EntryCriteria::default();
        let ctx = SortContext { reconciled: Some(&rec), criteria: &criteria };
        let s = ViewState::default().with_default_sort(DefaultSort::OverlapCount);
        let out = apply_view(&b.rows, &s, &ctx);
        assert_eq!(out[0].get("Ticker"), Some(&CellValue::text("1")));
    }
}
