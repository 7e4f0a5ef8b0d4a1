//! Declarative alias table for header lookups.
//!
//! Source sheets name the same column differently depending on the tab.
//! Each logical field lists its candidate headers in preference order.

use crate::models::{CellValue, Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    pub name: &'static str,
    pub candidates: &'static [&'static str],
}

impl FieldAlias {
    pub const fn new(name: &'static str, candidates: &'static [&'static str]) -> Self {
        Self { name, candidates }
    }

    /// First candidate present with a non-blank value.
    pub fn lookup<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.candidates
            .iter()
            .filter_map(|key| row.get(key))
            .find(|v| !v.is_blank())
    }

    pub fn number(&self, row: &Row) -> Option<f64> {
        self.lookup(row).and_then(CellValue::as_number)
    }

    pub fn text(&self, row: &Row) -> Option<String> {
        self.lookup(row).map(|v| v.display().trim().to_string())
    }

    pub fn is_present(&self, row: &Row) -> bool {
        self.lookup(row).is_some()
    }

    /// Whether a header names this field.
    pub fn matches(&self, header: &str) -> bool {
        self.candidates.contains(&header)
    }
}

pub mod fields {
    use super::FieldAlias;

    // Index scorecard
    pub const INDEX_NAME: FieldAlias = FieldAlias::new("index_name", &["Name", "指数名", "指数"]);
    pub const PRICE: FieldAlias = FieldAlias::new("price", &["Price", "現在値", "終値"]);
    pub const EMA21_DIST: FieldAlias =
        FieldAlias::new("ema21_distance", &["21EMA(%)", "21EMA乖離率(%)", "vs 21EMA"]);
    pub const SMA50_DIST: FieldAlias =
        FieldAlias::new("sma50_distance", &["50SMA(%)", "50SMA乖離率(%)", "vs 50SMA"]);

    // Breadth rows embedded in the index sheet
    pub const ADVANCES: FieldAlias = FieldAlias::new("advances", &["Advances", "値上がり"]);
    pub const DECLINES: FieldAlias = FieldAlias::new("declines", &["Declines", "値下がり"]);
    pub const ADVANCING_PCT: FieldAlias =
        FieldAlias::new("advancing_pct", &["Adv%", "値上がり率(%)"]);
    pub const TORAKU_25: FieldAlias =
        FieldAlias::new("toraku_ratio_25", &["騰落25", "騰落レシオ(25日)"]);
    pub const TORAKU_10: FieldAlias =
        FieldAlias::new("toraku_ratio_10", &["騰落10", "騰落レシオ(10日)"]);
    pub const NEW_HIGHS: FieldAlias = FieldAlias::new("new_highs", &["NH", "新高値"]);
    pub const NEW_LOWS: FieldAlias = FieldAlias::new("new_lows", &["NL", "新安値"]);

    // Sector sheet
    pub const SECTOR: FieldAlias = FieldAlias::new("sector", &["Sector", "セクター", "業種"]);
    pub const RS_21: FieldAlias = FieldAlias::new("rs_21", &["RS21", "RS(21日)"]);
    pub const RS_63: FieldAlias = FieldAlias::new("rs_63", &["RS63", "RS(63日)"]);
    pub const ER_DAILY: FieldAlias = FieldAlias::new("er_daily", &["ER1D", "業績修正(日)"]);
    pub const ER_WEEKLY: FieldAlias = FieldAlias::new("er_weekly", &["ER1W", "業績修正(週)"]);
    pub const ER_MONTHLY: FieldAlias = FieldAlias::new("er_monthly", &["ER1M", "業績修正(月)"]);
    pub const BAND_80: FieldAlias = FieldAlias::new("band_80", &["Band≥80%", "80%以上(%)"]);

    // Screener
    pub const TICKER: FieldAlias = FieldAlias::new("ticker", &["Ticker", "コード", "Code"]);
    pub const STOCK_NAME: FieldAlias = FieldAlias::new("stock_name", &["Name", "銘柄名"]);
    pub const ADR_PCT: FieldAlias = FieldAlias::new("adr_pct", &["ADR%", "ADR(%)"]);
    pub const EMA21_ATR: FieldAlias =
        FieldAlias::new("ema21_atr_multiple", &["21EMA/ATR", "21EMA乖離(ATR)"]);
    pub const SMA50_PCT: FieldAlias =
        FieldAlias::new("sma50_distance_pct", &["50SMA%", "50SMA乖離率(%)"]);
    pub const SMA50_ATR: FieldAlias =
        FieldAlias::new("sma50_atr_multiple", &["50SMA/ATR", "50SMA乖離(ATR)"]);

    // History sheet
    pub const DATE: FieldAlias = FieldAlias::new("date", &["Date", "日付"]);
    pub const SCREEN: FieldAlias = FieldAlias::new("screen", &["Screen", "スクリーン"]);

    /// Columns sorted as text instead of numbers.
    pub const TEXT_COLUMNS: &[FieldAlias] = &[TICKER, STOCK_NAME, SECTOR];
}
