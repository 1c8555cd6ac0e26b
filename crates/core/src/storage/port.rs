use crate::storage::error::StorageError;
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 业务无关的本地 KV 存储接口 (Port)，语义对齐浏览器 localStorage。
///
/// # Invariants
/// - 同步调用，只处理字符串值，保证 Trait 对象安全。
/// - 同一个键只保存一条记录，写入即覆盖 (last-write-wins)。
pub trait LocalStorage: Send + Sync {
    /// # Summary
    /// 写入字符串值。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 待写入的内容。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StorageError`。
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Summary
    /// 读取字符串值。
    ///
    /// # Returns
    /// 存在则返回 `Some(String)`，否则返回 `None`。
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 删除指定键；键不存在时同样返回 Ok。
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// # Summary
/// 本地存储泛型扩展接口，提供 JSON 序列化支持。
///
/// # Invariants
/// - 自动为所有实现 `LocalStorage` 的类型提供支持。
pub trait LocalStorageExt: LocalStorage {
    /// # Summary
    /// 存入强类型对象。
    ///
    /// # Logic
    /// 1. 使用 JSON 序列化对象。
    /// 2. 调用底层 `set_item` 写入。
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text =
            serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.set_item(key, &text)
    }

    /// # Summary
    /// 取出强类型对象。
    ///
    /// # Logic
    /// 1. 调用底层 `get_item` 获取文本。
    /// 2. 使用 JSON 反序列化为目标类型，失败视为记录损坏。
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get_item(key)? {
            Some(text) => {
                let value =
                    serde_json::from_str(&text).map_err(|e| StorageError::Corrupt(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl<T: LocalStorage + ?Sized> LocalStorageExt for T {}
