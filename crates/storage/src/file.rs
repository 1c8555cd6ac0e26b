use horizon_core::storage::error::StorageError;
use horizon_core::storage::port::LocalStorage;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// 基于目录的本地存储，每个键对应一个 `<key>.json` 文件。
///
/// # Summary
/// 命令行宿主以此替代浏览器 localStorage，使最近一次查询在进程之间保留。
///
/// # Invariants
/// * 键只允许字母、数字、`_` 与 `-`，避免路径穿越。
/// * 写入先落到临时文件再重命名，读者不会看到写了一半的记录。
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// 创建新的 FileStorage 实例。
    ///
    /// # Logic
    /// 1. 确保目标目录存在。
    ///
    /// # Arguments
    /// * `base_path` - 记录文件所在目录。
    ///
    /// # Returns
    /// * `Result<Self, StorageError>` - 存储实例或目录创建失败的错误。
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self { base_path })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Unavailable(format!("Invalid key: {}", key)));
        }
        Ok(self.base_path.join(format!("{}.json", key)))
    }
}

impl LocalStorage for FileStorage {
    /// # Summary
    /// 写入记录。
    ///
    /// # Logic
    /// 1. 写入 `<key>.json.tmp`。
    /// 2. 原子重命名为 `<key>.json`，覆盖旧记录。
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        debug!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Unavailable(e.to_string())),
        }
    }
}
