use crate::parse;
use async_trait::async_trait;
use horizon_core::common::{DateRange, Symbol};
use horizon_core::config::ApiConfig;
use horizon_core::market::entity::{PricePoint, SymbolMatch, TickerOverview};
use horizon_core::market::error::MarketError;
use horizon_core::market::port::{PriceHistoryProvider, TickerDirectory};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// # Summary
/// Horizon 行情 API 客户端，同时提供聚合价格、搜索与公司概览。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，客户端可廉价克隆并在任务间共享。
/// - `base_url` 不以 `/` 结尾。
#[derive(Clone)]
pub struct HorizonProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    base_url: String,
}

impl HorizonProvider {
    /// # Summary
    /// 根据 API 配置创建客户端。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密后端（已安装时跳过）。
    /// 2. 按配置设置请求超时。
    /// 3. 规范化 base_url，去掉末尾的 `/`。
    ///
    /// # Arguments
    /// * `config`: API 配置。
    ///
    /// # Returns
    /// 成功返回客户端，HTTP 客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &ApiConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Summary
    /// 发起 GET 请求并返回 JSON 响应体。
    ///
    /// # Logic
    /// 1. 传输失败映射为 `Network`。
    /// 2. 非 2xx 状态映射为 `Api`，优先使用错误信封中的 message。
    /// 3. 响应体不是合法 JSON 时映射为 `Malformed`。
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MarketError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<Value>()
                .await
                .ok()
                .as_ref()
                .and_then(parse::error_message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(MarketError::Api(message));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| MarketError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl PriceHistoryProvider for HorizonProvider {
    /// # Summary
    /// 请求日线聚合数据。
    ///
    /// # Logic
    /// 1. 构建 `/stocks/aggregates/{symbol}` 请求，日期格式 YYYY-MM-DD。
    /// 2. 按已知信封与字段别名归一化结果。
    async fn fetch_aggregates(
        &self,
        symbol: &Symbol,
        range: DateRange,
        limit: u32,
    ) -> Result<Vec<PricePoint>, MarketError> {
        let path = format!("/stocks/aggregates/{}", symbol);
        let body = self
            .get_json(
                &path,
                &[
                    ("multiplier", "1".to_string()),
                    ("timespan", "day".to_string()),
                    ("from", range.from.format(DATE_FORMAT).to_string()),
                    ("to", range.to.format(DATE_FORMAT).to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(parse::aggregates(&body))
    }
}

#[async_trait]
impl TickerDirectory for HorizonProvider {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SymbolMatch>, MarketError> {
        let body = self
            .get_json(
                "/stocks/search",
                &[
                    ("search", query.to_string()),
                    ("active", "true".to_string()),
                    ("market", "stocks".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        Ok(parse::symbol_matches(&body))
    }

    /// # Summary
    /// 获取公司概览。
    ///
    /// # Logic
    /// 1. 请求 `/stocks/overview/{symbol}`。
    /// 2. 读取 `data` 字段（兼容无信封的响应）并反序列化。
    async fn overview(&self, symbol: &Symbol) -> Result<TickerOverview, MarketError> {
        let path = format!("/stocks/overview/{}", symbol);
        let mut body = self.get_json(&path, &[]).await?;

        let data = body.get_mut("data").map(Value::take).unwrap_or(body);
        serde_json::from_value(data).map_err(|e| MarketError::Malformed(e.to_string()))
    }
}
