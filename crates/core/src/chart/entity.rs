use crate::common::Symbol;
use serde::{Deserialize, Serialize};

/// # Summary
/// 交给渲染适配器的完整图表描述（兼容 Chart.js 配置结构）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// # Summary
/// 图表数据：共享的 X 轴标签与每个证券一条数据集。
///
/// # Invariants
/// - 每个数据集的 `data` 长度与 `labels` 相同。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// # Summary
/// 单条折线数据集。
///
/// # Invariants
/// - `data` 中的 `None` 序列化为 `null`，渲染端必须视为缺口而不是 0。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub background_color: String,
    pub border_width: u32,
    pub fill: bool,
    pub tension: f64,
    pub point_radius: u32,
    pub point_style: String,
    pub point_rotation: u32,
    pub point_hover_radius: u32,
    pub point_background_color: String,
}

impl Dataset {
    /// 以统一的折线样式创建数据集，颜色用于边框、填充与数据点。
    pub fn line(label: impl Into<String>, data: Vec<Option<f64>>, color: &str) -> Self {
        Self {
            label: label.into(),
            data,
            border_color: color.to_string(),
            background_color: color.to_string(),
            border_width: 2,
            fill: false,
            tension: 0.1,
            point_radius: 0,
            point_style: "line".to_string(),
            point_rotation: 90,
            point_hover_radius: 300,
            point_background_color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub interaction: Interaction,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub mode: String,
    pub intersect: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plugins {
    pub legend: Legend,
    pub zoom: ZoomPlugin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Legend {
    pub display: bool,
    pub position: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoomPlugin {
    pub zoom: ZoomOptions,
    pub pan: PanOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoomOptions {
    pub wheel: WheelOptions,
    pub pinch: Toggle,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WheelOptions {
    pub enabled: bool,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PanOptions {
    pub enabled: bool,
    pub mode: String,
    pub modifier_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub title: AxisTitle,
    pub grid: Grid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grid {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for ChartOptions {
    /// 折线图默认配置：按索引联动提示、顶部图例、X 轴方向的滚轮缩放与 Ctrl 平移。
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            interaction: Interaction {
                mode: "index".to_string(),
                intersect: false,
            },
            plugins: Plugins {
                legend: Legend {
                    display: true,
                    position: "top".to_string(),
                },
                zoom: ZoomPlugin {
                    zoom: ZoomOptions {
                        wheel: WheelOptions {
                            enabled: true,
                            speed: 0.05,
                        },
                        pinch: Toggle { enabled: true },
                        mode: "x".to_string(),
                    },
                    pan: PanOptions {
                        enabled: true,
                        mode: "x".to_string(),
                        modifier_key: "ctrl".to_string(),
                    },
                },
            },
            scales: Scales {
                x: Axis {
                    begin_at_zero: None,
                    title: AxisTitle {
                        display: true,
                        text: "Date".to_string(),
                    },
                    grid: Grid {
                        display: false,
                        color: None,
                    },
                },
                y: Axis {
                    begin_at_zero: Some(false),
                    title: AxisTitle {
                        display: true,
                        text: "Price ($)".to_string(),
                    },
                    grid: Grid {
                        display: true,
                        color: Some("#f0f0f0".to_string()),
                    },
                },
            },
        }
    }
}

/// # Summary
/// 写入本地存储的最近一次查询记录。
///
/// # Invariants
/// - 全局只保存一条，固定键名，写入即覆盖。
/// - `now - timestamp >= 24h` 时视为过期。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSearchState {
    // 最近查询的锚点证券
    pub ticker: Symbol,
    // 图表上已应用的对比集合，首个元素为锚点
    pub comparison_symbols: Vec<Symbol>,
    // 写入时间 (毫秒时间戳)
    pub timestamp: i64,
}
