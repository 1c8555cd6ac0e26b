use crate::align::AlignedSeries;
use chrono::DateTime;
use horizon_core::chart::entity::{ChartData, ChartOptions, ChartSpec, Dataset};
use horizon_core::common::Symbol;

/// 数据集配色，按证券在对比集合中的位置循环取用。
pub const PALETTE: [&str; 4] = ["#0078d7", "#ff6b6b", "#51cf66", "#ffaa00ff"];

/// 第 `idx` 个数据集的颜色。
pub fn color_for(idx: usize) -> &'static str {
    PALETTE[idx % PALETTE.len()]
}

/// 时间戳对应的 UTC 日期标签 (YYYY-MM-DD)。
pub fn date_label(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn labels(aligned: &AlignedSeries) -> Vec<String> {
    aligned.timeline.iter().map(|ts| date_label(*ts)).collect()
}

/// # Summary
/// 单证券模式的图表描述。
///
/// # Logic
/// 1. 时间轴直接作为 X 轴标签。
/// 2. 唯一的数据集命名为 `"{SYM} Close Price"`，使用首个配色。
pub fn single_chart(symbol: &Symbol, aligned: &AlignedSeries) -> ChartSpec {
    let data = aligned.values(symbol).map(<[_]>::to_vec).unwrap_or_default();
    line_chart(ChartData {
        labels: labels(aligned),
        datasets: vec![Dataset::line(
            format!("{} Close Price", symbol),
            data,
            color_for(0),
        )],
    })
}

/// # Summary
/// 对比模式的图表描述。
///
/// # Logic
/// 1. 数据集顺序严格按 `order`（已应用集合），与抓取完成顺序无关。
/// 2. 数据集以证券代码命名，缺口保持为 `None`。
/// 3. 对齐结果中缺少的证券输出全空数据集，保证长度与标签一致。
pub fn comparison_chart(order: &[Symbol], aligned: &AlignedSeries) -> ChartSpec {
    let datasets = order
        .iter()
        .enumerate()
        .map(|(idx, symbol)| {
            let data = aligned
                .values(symbol)
                .map(<[_]>::to_vec)
                .unwrap_or_else(|| vec![None; aligned.timeline.len()]);
            Dataset::line(symbol.to_string(), data, color_for(idx))
        })
        .collect();

    line_chart(ChartData {
        labels: labels(aligned),
        datasets,
    })
}

fn line_chart(data: ChartData) -> ChartSpec {
    ChartSpec {
        kind: "line".to_string(),
        data,
        options: ChartOptions::default(),
    }
}
