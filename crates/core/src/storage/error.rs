use thiserror::Error;

/// # Summary
/// 本地存储域错误枚举，处理序列化、损坏记录及底层介质故障。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 上游只记录日志并忽略，存储失败永远不能阻塞图表渲染。
#[derive(Error, Debug)]
pub enum StorageError {
    // 数据序列化失败
    #[error("Serialize error: {0}")]
    Serialize(String),
    // 记录损坏，无法反序列化
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    // 底层介质不可用（磁盘、权限等）
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    // 超出容量配额
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),
}
