//! Shared number and date normalizers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::CellValue;

/// Parse a display-formatted number: strips thousands separators, yen glyphs,
/// percent signs and surrounding whitespace. `None` means absent, not zero.
pub fn parse_locale_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '¥' | '￥' | '%'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric conversion used while typing cells: plain float syntax only,
/// finite values only. Anything with separators or symbols stays text.
pub fn parse_plain_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn is_percent_string(v: &CellValue) -> bool {
    matches!(v, CellValue::Text(s) if s.trim_end().ends_with('%'))
}

/// `YYYY-M-D` prefix, returning (year, month, day).
pub(crate) fn iso_date_prefix(s: &str) -> Option<(i32, u32, u32)> {
    let mut parts = s.splitn(3, '-');
    let year = parts.next()?;
    let month = parts.next()?;
    let rest = parts.next()?;
    if year.len() != 4 || !all_digits(year) {
        return None;
    }
    let day = leading_digits(rest, 2)?;
    Some((year.parse().ok()?, small_number(month)?, day))
}

/// `M/D/YYYY` prefix, returning (month, day, year).
pub(crate) fn us_date_prefix(s: &str) -> Option<(u32, u32, i32)> {
    let mut parts = s.splitn(3, '/');
    let month = small_number(parts.next()?)?;
    let day = small_number(parts.next()?)?;
    let rest = parts.next()?;
    let year: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if year.len() != 4 {
        return None;
    }
    Some((month, day, year.parse().ok()?))
}

fn short_month_day(s: &str) -> bool {
    let mut parts = s.split('/');
    matches!(
        (parts.next().and_then(small_number), parts.next().and_then(small_number), parts.next()),
        (Some(_), Some(_), None)
    )
}

pub(crate) fn is_serial_date(s: &str) -> bool {
    s.len() == 5 && all_digits(s)
}

/// Spreadsheet serial day number to a calendar date (epoch 1899-12-30).
pub fn serial_to_date(serial: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial))
}

/// Shorten a date label to `M/D`. Unrecognized input comes back unchanged;
/// feeding the output back in is a no-op.
pub fn short_date_label(d: &str) -> String {
    let s = d.trim();

    if is_serial_date(s) {
        if let Some(date) = s.parse().ok().and_then(serial_to_date) {
            return format!("{}/{}", date.month(), date.day());
        }
    }
    if let Some((_, m, day)) = iso_date_prefix(s) {
        return format!("{}/{}", m, day);
    }
    if let Some((m, day, _)) = us_date_prefix(s) {
        return format!("{}/{}", m, day);
    }
    if short_month_day(s) {
        return s.to_string();
    }
    match parse_generic_date(s) {
        Some(date) => format!("{}/{}", date.month(), date.day()),
        None => d.to_string(),
    }
}

fn parse_generic_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y/%m/%d", "%Y年%m月%d日", "%b %d, %Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn small_number(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !all_digits(s) {
        return None;
    }
    s.parse().ok()
}

fn leading_digits(s: &str, max: usize) -> Option<u32> {
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() > max {
        return None;
    }
    digits.parse().ok()
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_number_strips_symbols() {
        assert_eq!(parse_locale_number("¥1,234,567"), Some(1234567.0));
        assert_eq!(parse_locale_number("￥ 980"), Some(980.0));
        assert_eq!(parse_locale_number(" -12.5% "), Some(-12.5));
        assert_eq!(parse_locale_number(""), None);
        assert_eq!(parse_locale_number("--"), None);
        assert_eq!(parse_locale_number("NaN"), None);
    }

    #[test]
    fn plain_number_rejects_separators() {
        assert_eq!(parse_plain_number("1e3"), Some(1000.0));
        assert_eq!(parse_plain_number(" 42 "), Some(42.0));
        assert_eq!(parse_plain_number("1,000"), None);
        assert_eq!(parse_plain_number("inf"), None);
    }

    #[test]
    fn percent_detection() {
        assert!(is_percent_string(&CellValue::text("+3.2%")));
        assert!(!is_percent_string(&CellValue::Number(3.2)));
        assert!(!is_percent_string(&CellValue::text("3.2")));
    }

    #[test]
    fn short_labels_for_each_format() {
        assert_eq!(short_date_label("2024-03-07"), "3/7");
        assert_eq!(short_date_label("2024-3-7 15:00"), "3/7");
        assert_eq!(short_date_label("12/25/2024"), "12/25");
        assert_eq!(short_date_label("3/7"), "3/7");
        assert_eq!(short_date_label("2024/03/07"), "3/7");
        assert_eq!(short_date_label("2024年3月7日"), "3/7");
        assert_eq!(short_date_label("next week"), "next week");
    }

    #[test]
    fn short_label_is_idempotent() {
        let once = short_date_label("2024-3-7");
        assert_eq!(once, "3/7");
        assert_eq!(short_date_label(&once), once);
        let serial = short_date_label("46067");
        assert_eq!(short_date_label(&serial), serial);
    }

    #[test]
    fn serial_dates_use_1899_epoch() {
        assert_eq!(short_date_label("46067"), "2/14");
        assert_eq!(short_date_label("45658"), "1/1");
        assert_eq!(serial_to_date(25569), NaiveDate::from_ymd_opt(1970, 1, 1));
    }

    #[test]
    fn date_prefix_matchers() {
        assert_eq!(iso_date_prefix("2024-3-7"), Some((2024, 3, 7)));
        assert_eq!(iso_date_prefix("24-3-7"), None);
        assert_eq!(us_date_prefix("3/7/2024"), Some((3, 7, 2024)));
        assert_eq!(us_date_prefix("3/7"), None);
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(round1(11.666), 11.7);
        assert_eq!(round1(5.0), 5.0);
    }
}
