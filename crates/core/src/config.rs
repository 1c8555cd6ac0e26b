use crate::common::Timeframe;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

/// 远端行情 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// 聚合 K 线请求的 `limit` 参数，需覆盖最长的时间窗口
    pub aggregate_limit: u32,
    /// 搜索接口返回的候选数量
    pub search_limit: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub default_timeframe: Timeframe,
    pub max_comparison_symbols: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志文件目录；为空时只输出到 stderr
    pub dir: Option<String>,
    /// 默认过滤级别，可被 RUST_LOG 覆盖
    pub level: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.horizonwake.com".to_string(),
            aggregate_limit: 730,
            search_limit: 10,
            timeout_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_timeframe: Timeframe::TwoYears,
            max_comparison_symbols: 4,
        }
    }
}
