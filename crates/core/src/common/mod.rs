pub mod time;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 证券代码，系统中唯一识别一只股票的大写字符串。
///
/// # Invariants
/// - 内容已去除首尾空白并转为大写，反序列化同样经过规范化与校验。
/// - 除相等比较外不假设任何内部结构。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// 规范化并包装证券代码（去空白、转大写）。
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = Symbol::new(s);
        if symbol.0.is_empty() {
            return Err("Empty symbol".to_string());
        }
        if symbol.0.chars().any(char::is_whitespace) {
            return Err(format!("Invalid symbol: {}", s));
        }
        Ok(symbol)
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// # Summary
/// 图表时间窗口枚举，每个取值对应固定的回溯天数。
///
/// # Invariants
/// - 整个图表同一时刻只有一个生效的时间窗口。
/// - 序列化形式与界面选项代码一致 (`1m`, `3m`, `6m`, `1y`, `2y`)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    // 1 个月
    #[serde(rename = "1m")]
    OneMonth,
    // 3 个月
    #[serde(rename = "3m")]
    ThreeMonths,
    // 6 个月
    #[serde(rename = "6m")]
    SixMonths,
    // 1 年
    #[serde(rename = "1y")]
    OneYear,
    // 2 年
    #[default]
    #[serde(rename = "2y")]
    TwoYears,
}

impl Timeframe {
    /// 下拉框中展示的全部时间窗口，按跨度升序。
    pub const ALL: [Timeframe; 5] = [
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::SixMonths,
        Timeframe::OneYear,
        Timeframe::TwoYears,
    ];

    /// # Summary
    /// 获取时间窗口对应的回溯天数。
    ///
    /// # Returns
    /// 固定天数：1m=30, 3m=90, 6m=180, 1y=365, 2y=730。
    pub fn lookback_days(self) -> u64 {
        match self {
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 90,
            Timeframe::SixMonths => 180,
            Timeframe::OneYear => 365,
            Timeframe::TwoYears => 730,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Timeframe::OneMonth => "1m",
            Timeframe::ThreeMonths => "3m",
            Timeframe::SixMonths => "6m",
            Timeframe::OneYear => "1y",
            Timeframe::TwoYears => "2y",
        }
    }

    /// # Summary
    /// 计算以 `today` 为终点的请求日期区间。
    ///
    /// # Logic
    /// 1. `to` 直接取 `today`（UTC 日期，不含时间）。
    /// 2. `from = to - lookback_days`。
    ///
    /// # Arguments
    /// * `today`: 当前 UTC 日期。
    ///
    /// # Returns
    /// 闭区间 `[from, to]`。
    pub fn range_ending(self, today: NaiveDate) -> DateRange {
        let from = today
            .checked_sub_days(Days::new(self.lookback_days()))
            .unwrap_or(NaiveDate::MIN);
        DateRange { from, to: today }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.code() == code)
            .ok_or_else(|| format!("Unknown Timeframe: {}", s))
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// # Summary
/// 行情请求的日期区间（闭区间，按日）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalized() {
        assert_eq!(Symbol::new("  aapl ").as_str(), "AAPL");
        assert_eq!("msft".parse::<Symbol>().unwrap(), Symbol::new("MSFT"));
        assert!("".parse::<Symbol>().is_err());
        assert!("BRK B".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_deserialization_normalizes() {
        let symbol: Symbol = serde_json::from_str("\" aapl\"").unwrap();
        assert_eq!(symbol, Symbol::new("AAPL"));
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"AAPL\"");
        assert!(serde_json::from_str::<Symbol>("\"  \"").is_err());
        assert!(serde_json::from_str::<Symbol>("\"BRK B\"").is_err());
    }

    #[test]
    fn test_timeframe_lookback_days() {
        let expected = [30, 90, 180, 365, 730];
        for (tf, days) in Timeframe::ALL.iter().zip(expected) {
            assert_eq!(tf.lookback_days(), days);
        }
    }

    #[test]
    fn test_range_from_is_exactly_lookback_before_to() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for tf in Timeframe::ALL {
            let range = tf.range_ending(today);
            assert_eq!(range.to, today);
            let span = (range.to - range.from).num_days();
            assert_eq!(span, i64::try_from(tf.lookback_days()).unwrap());
        }
        // 跨闰日
        let range = Timeframe::OneMonth.range_ending(today);
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_timeframe_codes_round_trip() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.code().parse::<Timeframe>().unwrap(), tf);
            let json = serde_json::to_string(&tf).unwrap();
            assert_eq!(json, format!("\"{}\"", tf.code()));
        }
        assert!("5y".parse::<Timeframe>().is_err());
        assert_eq!(Timeframe::default(), Timeframe::TwoYears);
    }
}
