use horizon_core::common::Symbol;
use horizon_core::market::entity::PricePoint;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 一次渲染周期内各证券的原始序列。
pub type SymbolSeries = BTreeMap<Symbol, Vec<PricePoint>>;

/// # Summary
/// 对齐结果：共享的时间轴与各证券在该轴上的取值。
///
/// # Invariants
/// - `timeline` 严格升序且无重复。
/// - 每个 `series` 值的长度等于 `timeline` 的长度；`None` 表示该日无数据（缺口，而非 0）。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    pub timeline: Vec<i64>,
    pub series: BTreeMap<Symbol, Vec<Option<f64>>>,
}

impl AlignedSeries {
    pub fn values(&self, symbol: &Symbol) -> Option<&[Option<f64>]> {
        self.series.get(symbol).map(Vec::as_slice)
    }
}

/// # Summary
/// 将多个证券的序列对齐到同一时间轴。
///
/// # Logic
/// 1. 收集所有序列中出现过的时间戳，去重并升序排列。
/// 2. 对每个证券按时间戳精确查找收盘价，缺失处填 `None`。
///
/// # Arguments
/// * `input`: 证券到序列的映射，序列内部顺序不作要求。
///
/// # Returns
/// 对齐后的结果，与输入的插入顺序无关。
pub fn align(input: &SymbolSeries) -> AlignedSeries {
    let timeline: Vec<i64> = input
        .values()
        .flatten()
        .map(|p| p.timestamp_ms)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = input
        .iter()
        .map(|(symbol, points)| {
            let by_ts: HashMap<i64, f64> =
                points.iter().map(|p| (p.timestamp_ms, p.close)).collect();
            let values = timeline.iter().map(|ts| by_ts.get(ts).copied()).collect();
            (symbol.clone(), values)
        })
        .collect();

    AlignedSeries { timeline, series }
}

/// # Summary
/// 单证券的快速路径：直接以自身序列作为时间轴。
///
/// # Invariants
/// - 要求 `points` 已升序且时间戳唯一（`SeriesFetcher` 的输出满足此条件），
///   此时结果与 `align` 单输入的结果完全相同。
pub fn align_single(symbol: &Symbol, points: &[PricePoint]) -> AlignedSeries {
    let timeline = points.iter().map(|p| p.timestamp_ms).collect();
    let values = points.iter().map(|p| Some(p.close)).collect();
    AlignedSeries {
        timeline,
        series: BTreeMap::from([(symbol.clone(), values)]),
    }
}
