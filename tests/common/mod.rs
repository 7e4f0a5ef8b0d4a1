#![allow(dead_code)]

use exposure_dashboard::config::{default_sources, Config};
use exposure_dashboard::sources::StaticSheetSource;

pub const INDICES_CSV: &str = "\u{feff}Name,Price,21EMA(%),50SMA(%),Date,Advances,Declines,Adv%,騰落25,騰落10,NH,NL
Nikkei 225,\"38,500\",2.1,4.0,,,,,,,,
TOPIX,\"2,710\",0.6,1.2,,,,,,,,
Growth 250,640,-1.8,-3.0,,,,,,,,
,,,,2024-03-06,900,700,,98.0,95.0,40,12
,,,,2024-03-07,1100,500,,115.0,104.0,130,6
";

pub const SECTORS_CSV: &str = "Sector,RS21,RS63,ER1D,ER1W,ER1M,Band≥80%
電気機器,72,65,0.1,0.8,1.2,35
機械,55,50,0,0.3,0.5,28
銀行業,45,60,-0.1,-0.2,0.1,12
小売業,25,20,0,0.4,0.2,8
,,,,,,
";

pub const MOMENTUM_CSV: &str = "Ticker,Name,Sector,RS,ADR%,21EMA/ATR,50SMA%,50SMA/ATR
\"=HYPERLINK(\"\"https://example.test/7203\"\",\"\"7203\"\")\",Toyota,輸送用機器,88,4.5,0.4,12,3.1
6758,Sony,電気機器,91,,0.9,18,4.2
9984,SoftBank,情報・通信業,75,6.1,1.8,30,7.5
";

pub const BREAKOUT_CSV: &str = "Ticker,Name,Sector,RS,ADR%
7203,Toyota,輸送用機器,,4.6
6861,Keyence,電気機器,82,3.2
";

pub const PULLBACK_CSV: &str = "Ticker,Name,Sector,RS,Note
6758,,電気機器,90,押し目
7203,Toyota,輸送用機器,87,
";

pub const EARNINGS_CSV: &str = "Ticker,Name,Sector,RS
4063,Shin-Etsu,化学,70
";

pub const PORTFOLIO_CSV: &str = "■ リスク管理
口座残高,許容リスク(%)
\"¥3,000,000\",1.0%
■ 保有ポジション
Ticker,Shares,P/L
7203,100,+4.2%
■ 成績統計
勝率,55%
";

pub const HISTORY_CSV: &str = "Date,Screen,Ticker,Name,Sector,RS
2024-03-06,Momentum,7203,Toyota,輸送用機器,80
2024-03-06,Momentum,8035,Tokyo Electron,電気機器,77
2024-03-06,Breakout,8035,Tokyo Electron,電気機器,77
2024-03-07,Momentum,7203,Toyota,輸送用機器,85
";

pub const HTML_BODY: &str = "\n  <!DOCTYPE html><html><body>Sign in</body></html>";

pub fn fixture_source() -> StaticSheetSource {
    StaticSheetSource::new()
        .with_body("Indices", INDICES_CSV)
        .with_body("Sectors", SECTORS_CSV)
        .with_body("Momentum", MOMENTUM_CSV)
        .with_body("Breakout", BREAKOUT_CSV)
        .with_body("Pullback", PULLBACK_CSV)
        .with_body("Earnings", EARNINGS_CSV)
        .with_body("Portfolio", PORTFOLIO_CSV)
        .with_body("History", HISTORY_CSV)
}

/// Default config with the stock source list, independent of the environment.
pub fn test_config() -> Config {
    let mut cfg = Config::from_env();
    cfg.sources = default_sources();
    cfg.sheet_base_url = String::new();
    cfg
}
