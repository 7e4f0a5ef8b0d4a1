//! Portfolio sheet splitter.
//!
//! The portfolio export is a single CSV with several "soft tables". A line
//! whose first field starts with [`SECTION_MARKER`] opens a new section; the
//! marker label maps to a [`PortfolioSection`] by substring containment.
//! Blank lines inside a section survive as `None` separators.

use tracing::debug;

use crate::models::{CellValue, Portfolio, PortfolioSection, Row, Table};
use crate::parsing::csv::tokenize;
use crate::parsing::table::{dedupe_headers, type_cell};

pub const SECTION_MARKER: char = '■';

/// Rows starting with these glyphs are notes, not data.
pub const ANNOTATION_PREFIXES: [char; 3] = ['※', '＊', '*'];

/// Checked in order; the first label contained in the marker text wins.
const SECTION_LABELS: &[(&str, PortfolioSection)] = &[
    ("リスク", PortfolioSection::Risk),
    ("エントリー", PortfolioSection::Entry),
    ("保有", PortfolioSection::Positions),
    ("ポジション", PortfolioSection::Positions),
    ("履歴", PortfolioSection::History),
    ("統計", PortfolioSection::Stats),
    ("成績", PortfolioSection::Stats),
];

/// One section's rows; `None` marks a blank separator line.
pub type SectionRows = Vec<Option<Vec<String>>>;

pub fn section_for_label(label: &str) -> Option<PortfolioSection> {
    let normalized: String = label
        .chars()
        .filter(|c| *c != SECTION_MARKER && !c.is_whitespace())
        .collect();
    SECTION_LABELS
        .iter()
        .find(|(needle, _)| normalized.contains(needle))
        .map(|(_, section)| *section)
}

/// Split rows into sections keyed by canonical section. Rows under an
/// unrecognized marker, or before any marker, are dropped. A section that
/// appears twice keeps both runs, concatenated.
pub fn split_sections(rows: &[Vec<String>]) -> Vec<(PortfolioSection, SectionRows)> {
    let mut out: Vec<(PortfolioSection, SectionRows)> = Vec::new();
    let mut current: Option<PortfolioSection> = None;

    for fields in rows {
        let first = fields.first().map(|f| f.trim()).unwrap_or("");
        if first.starts_with(SECTION_MARKER) {
            current = section_for_label(first);
            if current.is_none() {
                debug!("Ignoring unrecognized portfolio section {:?}", first);
            }
            continue;
        }
        let Some(section) = current else {
            continue;
        };

        let idx = match out.iter().position(|(s, _)| *s == section) {
            Some(idx) => idx,
            None => {
                out.push((section, Vec::new()));
                out.len() - 1
            }
        };
        let entry = &mut out[idx].1;
        if fields.iter().all(|f| f.trim().is_empty()) {
            entry.push(None);
        } else {
            entry.push(Some(fields.clone()));
        }
    }

    out
}

fn is_annotation(fields: &[String]) -> bool {
    fields
        .first()
        .map(|f| f.trim_start().starts_with(ANNOTATION_PREFIXES))
        .unwrap_or(false)
}

fn pair(headers: &[String], values: &[String]) -> Vec<(String, CellValue)> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty())
        .map(|(i, h)| {
            let v = values.get(i).map_or(CellValue::Null, |raw| type_cell(h, raw));
            (h.clone(), v)
        })
        .collect()
}

fn flush_group(group: &mut Vec<&Vec<String>>, out: &mut Row) {
    if let [headers, values, ..] = group.as_slice() {
        let headers = dedupe_headers(headers);
        for (k, v) in pair(&headers, values) {
            out.insert(k, v);
        }
    }
    group.clear();
}

/// Key-value groups: each run between separators is (headers, values);
/// rows past the second in a group are ignored.
pub fn key_value_groups(rows: &SectionRows) -> Row {
    let mut out = Row::new();
    let mut group: Vec<&Vec<String>> = Vec::new();

    for row in rows {
        match row {
            Some(fields) if is_annotation(fields) => {}
            Some(fields) => group.push(fields),
            None => flush_group(&mut group, &mut out),
        }
    }
    flush_group(&mut group, &mut out);
    out
}

/// Flat table: first row is headers, every later row is data. Rows whose
/// values are all null are dropped.
pub fn flat_table(rows: &SectionRows) -> Table {
    let mut data = rows.iter().flatten();
    let Some(header) = data.next() else {
        return Table::default();
    };
    let headers = dedupe_headers(header);
    let rows = data
        .map(|fields| Row::from_pairs(pair(&headers, fields)))
        .filter(|row| !row.all_blank())
        .collect();
    Table::new(headers.into_iter().filter(|h| !h.is_empty()).collect(), rows)
}

/// Stats: every row is one (key, value) pair.
pub fn stats_pairs(rows: &SectionRows) -> Row {
    let mut out = Row::new();
    for fields in rows.iter().flatten() {
        let key = fields[0].trim();
        if key.is_empty() {
            continue;
        }
        let value = fields.get(1).map_or(CellValue::Null, |raw| type_cell(key, raw));
        out.insert(key, value);
    }
    out
}

pub fn parse_portfolio(text: &str) -> Portfolio {
    let rows = tokenize(text);
    let mut portfolio = Portfolio::default();
    for (section, section_rows) in split_sections(&rows) {
        match section {
            PortfolioSection::Risk => portfolio.risk = key_value_groups(&section_rows),
            PortfolioSection::Entry => portfolio.entry = flat_table(&section_rows),
            PortfolioSection::Positions => portfolio.positions = flat_table(&section_rows),
            PortfolioSection::History => portfolio.history = flat_table(&section_rows),
            PortfolioSection::Stats => portfolio.stats = stats_pairs(&section_rows),
        }
    }
    portfolio
}
