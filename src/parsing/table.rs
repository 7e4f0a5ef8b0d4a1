use std::collections::{HashMap, HashSet};

use crate::models::{CellValue, Row, Table};
use crate::parsing::csv::{split_fields, split_lines};
use crate::parsing::normalize::{
    is_serial_date, iso_date_prefix, parse_plain_number, us_date_prefix,
};

/// Trim header names and suffix repeats with `_2`, `_3`, ... per name.
/// A suffix already used by a literal header is skipped.
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let trimmed: Vec<String> = raw.iter().map(|h| h.trim().to_string()).collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();

    trimmed
        .iter()
        .enumerate()
        .map(|(i, name)| {
            // a later literal header keeps its own name
            let claimed_later = |candidate: &str| trimmed[i + 1..].iter().any(|h| h == candidate);
            if taken.insert(name.clone()) {
                return name.clone();
            }
            let n = next_suffix.entry(name.clone()).or_insert(2);
            loop {
                let candidate = format!("{}_{}", name, n);
                *n += 1;
                if !claimed_later(&candidate) && taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}

/// Infer a cell's type. Precedence: blank, date-like text, 5-digit serial
/// under a "date" header, finite number, trimmed text.
pub fn type_cell(header: &str, raw: &str) -> CellValue {
    let t = raw.trim();
    if t.is_empty() {
        return CellValue::Null;
    }
    if iso_date_prefix(t).is_some() || us_date_prefix(t).is_some() {
        return CellValue::text(t);
    }
    if is_serial_date(t) && header.to_lowercase().contains("date") {
        return CellValue::text(t);
    }
    match parse_plain_number(t) {
        Some(n) => CellValue::Number(n),
        None => CellValue::text(t),
    }
}

/// Pair header names with one line's fields. Missing trailing fields are null.
pub fn build_row(headers: &[String], fields: &[String]) -> Row {
    Row::from_pairs(headers.iter().enumerate().map(|(i, h)| {
        let value = fields
            .get(i)
            .map_or(CellValue::Null, |raw| type_cell(h, raw));
        (h.clone(), value)
    }))
}

/// Build a table from pre-split rows; the first row is the header.
/// Fully blank data lines are dropped.
pub fn table_from_fields(rows: &[Vec<String>]) -> Table {
    let Some((header, data)) = rows.split_first() else {
        return Table::default();
    };
    let headers = dedupe_headers(header);
    let rows = data
        .iter()
        .filter(|fields| fields.iter().any(|f| !f.trim().is_empty()))
        .map(|fields| build_row(&headers, fields))
        .collect();
    Table::new(headers, rows)
}

/// Tokenize and build in one step.
pub fn parse_table(text: &str) -> Table {
    let rows: Vec<Vec<String>> = split_lines(text).iter().map(|l| split_fields(l)).collect();
    table_from_fields(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let h = dedupe_headers(&strings(&["A", "B", "A", "A"]));
        assert_eq!(h, vec!["A", "B", "A_2", "A_3"]);
    }

    #[test]
    fn suffixes_never_collide_with_literal_headers() {
        let h = dedupe_headers(&strings(&["A", "A", "A_2"]));
        assert_eq!(h, vec!["A", "A_3", "A_2"]);

        let t = parse_table("A,A,A_2\n1,2,3\n");
        assert_eq!(t.headers, vec!["A", "A_3", "A_2"]);
        let row = &t.rows[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row.number("A"), Some(1.0));
        assert_eq!(row.number("A_3"), Some(2.0));
        assert_eq!(row.number("A_2"), Some(3.0));
    }

    #[test]
    fn header_names_are_trimmed_before_dedup() {
        let h = dedupe_headers(&strings(&[" RS ", "RS", "ER"]));
        assert_eq!(h, vec!["RS", "RS_2", "ER"]);
    }

    #[test]
    fn cell_typing_precedence() {
        assert_eq!(type_cell("x", "   "), CellValue::Null);
        assert_eq!(type_cell("x", "2024-3-7"), CellValue::text("2024-3-7"));
        assert_eq!(type_cell("x", "3/7/2024"), CellValue::text("3/7/2024"));
        assert_eq!(type_cell("Trade Date", "45658"), CellValue::text("45658"));
        assert_eq!(type_cell("Volume", "45658"), CellValue::Number(45658.0));
        assert_eq!(type_cell("x", " 1.5 "), CellValue::Number(1.5));
        assert_eq!(type_cell("x", "12.5%"), CellValue::text("12.5%"));
        assert_eq!(type_cell("x", "1,234"), CellValue::text("1,234"));
    }

    #[test]
    fn blank_lines_are_dropped() {
        let t = parse_table("Ticker,Price\n7203,2500\n,\n\n6758, \n");
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].number("Price"), Some(2500.0));
        assert_eq!(t.rows[1].get("Price"), Some(&CellValue::Null));
    }

    #[test]
    fn short_rows_pad_with_null() {
        let t = parse_table("A,B,C\n1\n");
        assert_eq!(t.rows[0].get("C"), Some(&CellValue::Null));
    }

    #[test]
    fn duplicate_columns_keep_separate_values() {
        let t = parse_table("RS,RS\n10,20\n");
        assert_eq!(t.headers, vec!["RS", "RS_2"]);
        assert_eq!(t.rows[0].number("RS"), Some(10.0));
        assert_eq!(t.rows[0].number("RS_2"), Some(20.0));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("\u{feff}").headers.is_empty());
    }
}
