use crate::common::{DateRange, Symbol};
use crate::market::entity::{PricePoint, SymbolMatch, TickerOverview};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 日线聚合价格数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每次调用对应一次独立的网络请求，不同证券之间互不依赖，可并发调用。
/// - 实现者只负责归一化响应结构，不负责排序与去重。
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// # Summary
    /// 获取特定证券在日期区间内的日线收盘价。
    ///
    /// # Logic
    /// 1. 构建聚合接口请求 (multiplier=1, timespan=day)。
    /// 2. 执行网络请求并按已知的信封结构依次尝试解析。
    /// 3. 丢弃缺少时间戳或收盘价的条目。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `range`: 日期闭区间。
    /// * `limit`: 返回条目上限。
    ///
    /// # Returns
    /// 成功返回数据点列表（可能为空），失败返回 MarketError。
    async fn fetch_aggregates(
        &self,
        symbol: &Symbol,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<PricePoint>, MarketError>;
}

/// # Summary
/// 证券目录接口，供搜索框与宿主页面使用。
#[async_trait]
pub trait TickerDirectory: Send + Sync {
    /// # Summary
    /// 按关键字搜索活跃的股票。
    ///
    /// # Arguments
    /// * `query`: 用户输入的关键字。
    /// * `limit`: 候选数量上限。
    ///
    /// # Returns
    /// 候选列表。
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SymbolMatch>, MarketError>;

    /// # Summary
    /// 获取公司概览。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 概览实体，证券不存在时返回 `MarketError::Api`。
    async fn overview(&self, symbol: &Symbol) -> Result<TickerOverview, MarketError>;
}
