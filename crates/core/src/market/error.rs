use thiserror::Error;

/// # Summary
/// 行情数据域错误枚举，覆盖传输、接口状态及数据格式问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 在图表流水线的抓取边界被吞掉并降级为空序列，不会向上传播。
#[derive(Error, Debug)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 非成功的 HTTP 状态或错误信封
    #[error("API error: {0}")]
    Api(String),
    // 无法解析或结构不匹配的响应体
    #[error("Malformed data: {0}")]
    Malformed(String),
}
