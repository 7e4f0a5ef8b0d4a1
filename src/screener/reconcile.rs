use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Row, Table};
use crate::parsing::fields;
use crate::screener::ticker::row_ticker;

/// How a ticker seen again in a later source updates its merged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Keep the first source's row untouched.
    FirstSeen,
    /// Fill fields that are still blank; populated fields are never overwritten.
    FillEmpty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapEntry {
    pub ticker: String,
    /// Source keys in the order the ticker was found in them.
    pub screens: Vec<String>,
    pub display_name: Option<String>,
    pub sector: Option<String>,
    pub row: Row,
}

impl OverlapEntry {
    pub fn count(&self) -> usize {
        self.screens.len()
    }

    pub fn in_screen(&self, key: &str) -> bool {
        self.screens.iter().any(|s| s == key)
    }
}

/// One merged record per distinct ticker, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub headers: Vec<String>,
    pub entries: Vec<OverlapEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Reconciliation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&OverlapEntry> {
        self.index.get(ticker).map(|&i| &self.entries[i])
    }

    pub fn count_for(&self, ticker: &str) -> usize {
        self.get(ticker).map_or(0, OverlapEntry::count)
    }

    /// Entries found in at least `min_count` sources, most sources first.
    /// Equal counts keep first-seen order.
    pub fn overlaps(&self, min_count: usize) -> Vec<&OverlapEntry> {
        let mut out: Vec<&OverlapEntry> =
            self.entries.iter().filter(|e| e.count() >= min_count).collect();
        out.sort_by(|a, b| b.count().cmp(&a.count()));
        out
    }

    /// Merged rows as one table, shaped like a single screen.
    pub fn to_table(&self) -> Table {
        Table::new(
            self.headers.clone(),
            self.entries.iter().map(|e| e.row.clone()).collect(),
        )
    }
}

/// Merge per-source tables keyed by ticker. Sources are visited in slice
/// order, which must be stable across refreshes; rows without a ticker are
/// skipped.
pub fn reconcile(sources: &[(String, Table)], policy: MergePolicy) -> Reconciliation {
    let mut out = Reconciliation::default();

    for (key, table) in sources {
        for h in &table.headers {
            if !out.headers.contains(h) {
                out.headers.push(h.clone());
            }
        }

        for row in table.iter() {
            let Some(ticker) = row_ticker(row) else {
                continue;
            };

            match out.index.get(&ticker) {
                Some(&i) => {
                    let entry = &mut out.entries[i];
                    if policy == MergePolicy::FillEmpty {
                        fill_blank_fields(&mut entry.row, row);
                    }
                    if entry.display_name.is_none() {
                        entry.display_name = fields::STOCK_NAME.text(row);
                    }
                    if entry.sector.is_none() {
                        entry.sector = fields::SECTOR.text(row);
                    }
                    if !entry.in_screen(key) {
                        entry.screens.push(key.clone());
                    }
                }
                None => {
                    out.index.insert(ticker.clone(), out.entries.len());
                    out.entries.push(OverlapEntry {
                        ticker,
                        screens: vec![key.clone()],
                        display_name: fields::STOCK_NAME.text(row),
                        sector: fields::SECTOR.text(row),
                        row: row.clone(),
                    });
                }
            }
        }
    }

    out
}

fn fill_blank_fields(acc: &mut Row, incoming: &Row) {
    for (key, value) in incoming.iter() {
        if acc.is_blank(key) && !value.is_blank() {
            acc.insert(key, value.clone());
        } else if !acc.contains_key(key) {
            acc.insert(key, value.clone());
        }
    }
}
