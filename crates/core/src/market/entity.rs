use crate::common::Symbol;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个交易日的收盘价数据点。
///
/// # Invariants
/// - `timestamp_ms` 为 UTC 零点对齐的交易日毫秒时间戳。
/// - 同一序列内时间戳唯一，使用前按升序排列。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    // 交易日时间戳 (毫秒)
    pub timestamp_ms: i64,
    // 收盘价
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, close: f64) -> Self {
        Self {
            timestamp_ms,
            close,
        }
    }
}

/// # Summary
/// 搜索接口返回的候选证券。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymbolMatch {
    pub ticker: Symbol,
    pub name: Option<String>,
    // 主交易所 (例如: XNAS)
    pub primary_exchange: Option<String>,
}

/// # Summary
/// 公司概览。只保留宿主页面需要的字段，其余字段在反序列化时忽略。
///
/// # Invariants
/// - `kind == "CS"` 表示普通股，只有普通股会渲染图表。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerOverview {
    pub ticker: Symbol,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub homepage_url: Option<String>,
    pub market_cap: Option<f64>,
}

impl TickerOverview {
    pub fn is_common_stock(&self) -> bool {
        self.kind.as_deref() == Some("CS")
    }
}
