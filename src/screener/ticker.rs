use crate::models::{CellValue, Row};
use crate::parsing::fields;

const HYPERLINK: &str = "=HYPERLINK(";

/// Normalized ticker from a cell, unwrapping `=HYPERLINK(url, "label")`.
pub fn ticker_identity(value: &CellValue) -> Option<String> {
    let raw = match value {
        CellValue::Null => return None,
        CellValue::Number(_) => value.display(),
        CellValue::Text(s) => s.trim().to_string(),
    };

    let ticker = if is_hyperlink(&raw) {
        hyperlink_label(&raw)
    } else {
        raw
    };

    let ticker = ticker.trim().to_string();
    if ticker.is_empty() {
        None
    } else {
        Some(ticker)
    }
}

pub fn row_ticker(row: &Row) -> Option<String> {
    fields::TICKER.lookup(row).and_then(ticker_identity)
}

fn is_hyperlink(s: &str) -> bool {
    s.len() >= HYPERLINK.len()
        && s.is_char_boundary(HYPERLINK.len())
        && s[..HYPERLINK.len()].eq_ignore_ascii_case(HYPERLINK)
}

/// Label argument of a hyperlink formula: the last quoted string, or the
/// bare last argument when the label is not quoted.
fn hyperlink_label(formula: &str) -> String {
    let inner = formula[HYPERLINK.len()..].trim_end();
    let inner = inner.strip_suffix(')').unwrap_or(inner);

    let mut quoted: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => {
                if in_quotes {
                    quoted.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            _ if in_quotes => current.push(c),
            _ => {}
        }
    }

    if inner.trim_end().ends_with('"') || !inner.contains(',') {
        quoted.pop().unwrap_or_default()
    } else {
        inner.rsplit(',').next().unwrap_or("").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_numeric_tickers() {
        assert_eq!(ticker_identity(&CellValue::text(" 7203 ")).as_deref(), Some("7203"));
        assert_eq!(ticker_identity(&CellValue::Number(6758.0)).as_deref(), Some("6758"));
        assert_eq!(ticker_identity(&CellValue::Null), None);
        assert_eq!(ticker_identity(&CellValue::text("  ")), None);
    }

    #[test]
    fn hyperlink_wrapper_is_stripped() {
        let v = CellValue::text(r#"=HYPERLINK("https://example.test/chart?s=7203","7203")"#);
        assert_eq!(ticker_identity(&v).as_deref(), Some("7203"));
        let v = CellValue::text(r#"=hyperlink("https://example.test/q", "NVDA")"#);
        assert_eq!(ticker_identity(&v).as_deref(), Some("NVDA"));
    }

    #[test]
    fn label_may_contain_commas() {
        let v = CellValue::text(r#"=HYPERLINK("https://example.test/x","BRK,B")"#);
        assert_eq!(ticker_identity(&v).as_deref(), Some("BRK,B"));
    }

    #[test]
    fn hyperlink_without_label_uses_url() {
        let v = CellValue::text(r#"=HYPERLINK("https://example.test/9984")"#);
        assert_eq!(ticker_identity(&v).as_deref(), Some("https://example.test/9984"));
    }

    #[test]
    fn unquoted_label_argument() {
        let v = CellValue::text(r#"=HYPERLINK("https://example.test/x", 4063)"#);
        assert_eq!(ticker_identity(&v).as_deref(), Some("4063"));
    }
}
