use crate::models::{Row, Table};
use crate::parsing::fields;

/// Distinct values of the history `Date` field, first-seen order.
pub fn history_dates(history: &Table) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for row in history.iter() {
        if let Some(d) = fields::DATE.text(row) {
            if !dates.contains(&d) {
                dates.push(d);
            }
        }
    }
    dates
}

/// Rebuild per-screen tables for one historical date. Matching is an exact
/// string compare on `Date`; rows are grouped by `Screen`. Every key in
/// `screen_keys` gets a table, empty when the date has no rows for it.
pub fn slice_history(history: &Table, date: &str, screen_keys: &[String]) -> Vec<(String, Table)> {
    let headers: Vec<String> = history
        .headers
        .iter()
        .filter(|h| !fields::DATE.matches(h) && !fields::SCREEN.matches(h))
        .cloned()
        .collect();

    let mut out: Vec<(String, Table)> = screen_keys
        .iter()
        .map(|k| (k.clone(), Table::new(headers.clone(), Vec::new())))
        .collect();

    for row in history.iter() {
        if fields::DATE.text(row).as_deref() != Some(date) {
            continue;
        }
        let Some(screen) = fields::SCREEN.text(row) else {
            continue;
        };
        let Some((_, table)) = out.iter_mut().find(|(k, _)| *k == screen) else {
            continue;
        };
        table.rows.push(strip_slice_columns(row));
    }

    out
}

fn strip_slice_columns(row: &Row) -> Row {
    Row::from_pairs(
        row.iter()
            .filter(|(k, _)| !fields::DATE.matches(k) && !fields::SCREEN.matches(k))
            .map(|(k, v)| (k.to_string(), v.clone())),
    )
}
