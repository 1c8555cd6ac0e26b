use dashmap::DashMap;
use horizon_core::storage::error::StorageError;
use horizon_core::storage::port::LocalStorage;

/// # Summary
/// 基于 DashMap 的内存存储，生命周期与进程一致。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 可选的 `quota` 限制单条记录的字节数，用于模拟浏览器存储配额。
pub struct MemStorage {
    // 线程安全的 KV 存储容器
    items: DashMap<String, String>,
    // 单条记录的最大字节数
    quota: Option<usize>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
            quota: None,
        }
    }

    /// 创建带单条记录容量上限的实例。
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: DashMap::new(),
            quota: Some(quota),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorage for MemStorage {
    /// # Summary
    /// 写入记录，存在同名键则覆盖。
    ///
    /// # Returns
    /// * 超出配额时返回 `StorageError::QuotaExceeded`，原记录保持不变。
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StorageError::QuotaExceeded(format!(
                "{} bytes > {} bytes",
                value.len(),
                quota
            )));
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}
