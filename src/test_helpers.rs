use crate::models::{CellValue, Row, Table};

/// Scorecard row with the given 21EMA and 50SMA distances (percent).
pub fn index_row(name: &str, ema21: f64, sma50: f64) -> Row {
    Row::from_pairs([
        ("Name", CellValue::text(name)),
        ("Price", CellValue::Number(1000.0)),
        ("21EMA(%)", CellValue::Number(ema21)),
        ("50SMA(%)", CellValue::Number(sma50)),
    ])
}

/// Sector row with 21-day RS, weekly revision and band >= 80% share.
pub fn sector_row(name: &str, rs21: f64, er1w: f64, band80: f64) -> Row {
    Row::from_pairs([
        ("Sector", CellValue::text(name)),
        ("RS21", CellValue::Number(rs21)),
        ("RS63", CellValue::Number(rs21)),
        ("ER1W", CellValue::Number(er1w)),
        ("Band≥80%", CellValue::Number(band80)),
    ])
}

/// Table from headers and positional cell values.
pub fn table_of(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let rows = rows
        .into_iter()
        .map(|cells| Row::from_pairs(headers.iter().cloned().zip(cells)))
        .collect();
    Table::new(headers, rows)
}
