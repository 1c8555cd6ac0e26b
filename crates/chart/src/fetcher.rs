use horizon_core::common::time::TimeProvider;
use horizon_core::common::{Symbol, Timeframe};
use horizon_core::market::entity::PricePoint;
use horizon_core::market::port::PriceHistoryProvider;
use std::sync::Arc;
use tracing::{debug, warn};

/// # Summary
/// 图表流水线的抓取边界：将数据源的一切失败降级为空序列。
///
/// # Invariants
/// - `fetch` 永不返回错误；网络、状态码与数据格式错误只记录日志。
/// - 返回的序列按时间戳升序且时间戳唯一。
#[derive(Clone)]
pub struct SeriesFetcher {
    provider: Arc<dyn PriceHistoryProvider>,
    clock: Arc<dyn TimeProvider>,
    // 聚合请求的 limit，需覆盖最长的时间窗口
    limit: u32,
}

impl SeriesFetcher {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        clock: Arc<dyn TimeProvider>,
        limit: u32,
    ) -> Self {
        Self {
            provider,
            clock,
            limit,
        }
    }

    /// # Summary
    /// 抓取单个证券在指定时间窗口内的收盘价序列。
    ///
    /// # Logic
    /// 1. 以当前 UTC 日期为终点计算日期区间。
    /// 2. 调用数据源；失败时记录 warn 并返回空序列。
    /// 3. 按时间戳升序排序，相同时间戳保留最后出现的条目。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `timeframe`: 时间窗口。
    ///
    /// # Returns
    /// 规范化后的序列，可能为空。
    pub async fn fetch(&self, symbol: &Symbol, timeframe: Timeframe) -> Vec<PricePoint> {
        let range = timeframe.range_ending(self.clock.today());

        match self
            .provider
            .fetch_aggregates(symbol, range, self.limit)
            .await
        {
            Ok(points) => {
                let points = normalize(points);
                debug!(
                    "Fetched {} points for {} ({} .. {})",
                    points.len(),
                    symbol,
                    range.from,
                    range.to
                );
                points
            }
            Err(e) => {
                warn!("Fetch error for {} ({}): {}", symbol, timeframe, e);
                Vec::new()
            }
        }
    }
}

/// 排序并去重，重复时间戳以后出现的数据为准。
fn normalize(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    // 稳定排序保证相同时间戳保持原始先后
    points.sort_by_key(|p| p.timestamp_ms);
    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(last) if last.timestamp_ms == point.timestamp_ms => *last = point,
            _ => out.push(point),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sorts_and_dedups() {
        let points = vec![
            PricePoint::new(3, 30.0),
            PricePoint::new(1, 10.0),
            PricePoint::new(3, 31.0),
            PricePoint::new(2, 20.0),
        ];
        assert_eq!(
            normalize(points),
            vec![
                PricePoint::new(1, 10.0),
                PricePoint::new(2, 20.0),
                PricePoint::new(3, 31.0),
            ]
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
