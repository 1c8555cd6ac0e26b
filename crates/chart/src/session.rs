use horizon_core::chart::entity::PersistedSearchState;
use horizon_core::common::Symbol;
use horizon_core::common::time::TimeProvider;
use horizon_core::storage::port::{LocalStorage, LocalStorageExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// 最近一次查询在本地存储中的固定键名。
pub const STORAGE_KEY: &str = "stocks_last_search";

/// 记录的有效期：24 小时（毫秒）。
pub const FRESHNESS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// # Summary
/// 持久化桥：保存与恢复最近一次查询及其对比集合。
///
/// # Invariants
/// - 全局只有一条记录，保存即覆盖，不做跨进程合并。
/// - 任何存储错误只记录日志，永不阻塞图表渲染，也不向调用方抛出。
#[derive(Clone)]
pub struct SearchSession {
    storage: Arc<dyn LocalStorage>,
    clock: Arc<dyn TimeProvider>,
}

impl SearchSession {
    pub fn new(storage: Arc<dyn LocalStorage>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { storage, clock }
    }

    /// # Summary
    /// 无条件覆盖写入记录。
    ///
    /// # Logic
    /// 1. 序列化为 JSON 并写入固定键。
    /// 2. 失败时记录 warn 后返回。
    pub fn save(&self, state: &PersistedSearchState) {
        match self.storage.set_json(STORAGE_KEY, state) {
            Ok(()) => debug!(
                "Saved last search {} {:?}",
                state.ticker, state.comparison_symbols
            ),
            Err(e) => warn!("Error saving last search: {}", e),
        }
    }

    /// # Summary
    /// 以当前时间为时间戳记录一次查询。
    ///
    /// # Arguments
    /// * `ticker`: 锚点证券。
    /// * `comparison_symbols`: 已应用的对比集合；为空时记录为 `[ticker]`。
    pub fn record(&self, ticker: &Symbol, comparison_symbols: &[Symbol]) {
        let comparison_symbols = if comparison_symbols.is_empty() {
            vec![ticker.clone()]
        } else {
            comparison_symbols.to_vec()
        };
        self.save(&PersistedSearchState {
            ticker: ticker.clone(),
            comparison_symbols,
            timestamp: self.clock.now_ms(),
        });
    }

    /// # Summary
    /// 读取仍然有效的记录。
    ///
    /// # Logic
    /// 1. 记录不存在、无法解析或读取失败时返回 None。
    /// 2. 记录年龄 `now - timestamp >= 24h` 时视为过期并返回 None。
    ///
    /// # Returns
    /// 有效记录或 None。
    pub fn load(&self) -> Option<PersistedSearchState> {
        let state = match self.storage.get_json::<PersistedSearchState>(STORAGE_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => return None,
            Err(e) => {
                warn!("Error loading last search: {}", e);
                return None;
            }
        };

        let age = self.clock.now_ms().saturating_sub(state.timestamp);
        if age >= FRESHNESS_WINDOW_MS {
            debug!("Last search for {} is stale ({} ms old)", state.ticker, age);
            return None;
        }
        Some(state)
    }

    /// 删除记录。
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(STORAGE_KEY) {
            warn!("Error clearing last search: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use horizon_core::common::time::FakeClockProvider;
    use horizon_core::storage::error::StorageError;

    /// 读写均失败的存储介质
    struct BrokenStorage;

    impl LocalStorage for BrokenStorage {
        fn set_item(&self, _: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded("full".into()))
        }
        fn get_item(&self, _: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
        fn remove_item(&self, _: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    /// 只保存一条记录的内存存储
    #[derive(Default)]
    struct CellStorage(std::sync::Mutex<Option<String>>);

    impl LocalStorage for CellStorage {
        fn set_item(&self, _: &str, value: &str) -> Result<(), StorageError> {
            *self.0.lock().unwrap() = Some(value.to_string());
            Ok(())
        }
        fn get_item(&self, _: &str) -> Result<Option<String>, StorageError> {
            Ok(self.0.lock().unwrap().clone())
        }
        fn remove_item(&self, _: &str) -> Result<(), StorageError> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    fn setup() -> (SearchSession, Arc<FakeClockProvider>, Arc<CellStorage>) {
        let clock = Arc::new(FakeClockProvider::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let storage = Arc::new(CellStorage::default());
        (SearchSession::new(storage.clone(), clock.clone()), clock, storage)
    }

    #[test]
    fn test_freshness_boundary() {
        let (session, clock, _) = setup();
        session.record(&Symbol::new("AAPL"), &[]);

        clock.advance(Duration::milliseconds(FRESHNESS_WINDOW_MS - 1));
        assert!(session.load().is_some());

        clock.advance(Duration::milliseconds(1));
        assert!(session.load().is_none(), "exactly 24h old must be stale");

        clock.advance(Duration::milliseconds(1));
        assert!(session.load().is_none());
    }

    #[test]
    fn test_record_defaults_to_anchor() {
        let (session, _, _) = setup();
        session.record(&Symbol::new("AAPL"), &[]);
        let state = session.load().unwrap();
        assert_eq!(state.ticker, Symbol::new("AAPL"));
        assert_eq!(state.comparison_symbols, vec![Symbol::new("AAPL")]);
    }

    #[test]
    fn test_wire_format() {
        let (session, clock, storage) = setup();
        session.record(&Symbol::new("AAPL"), &[Symbol::new("AAPL"), Symbol::new("MSFT")]);

        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ticker": "AAPL",
                "comparisonSymbols": ["AAPL", "MSFT"],
                "timestamp": clock.now_ms(),
            })
        );
    }

    #[test]
    fn test_corrupt_or_missing_record_is_absent() {
        let (session, _, storage) = setup();
        assert!(session.load().is_none());

        storage.set_item(STORAGE_KEY, "{\"ticker\": 42").unwrap();
        assert!(session.load().is_none());

        storage.set_item(STORAGE_KEY, "{\"ticker\":\"AAPL\"}").unwrap();
        assert!(session.load().is_none());
    }

    #[test]
    fn test_storage_failures_are_swallowed() {
        let clock = Arc::new(FakeClockProvider::new(Utc::now()));
        let session = SearchSession::new(Arc::new(BrokenStorage), clock);
        session.record(&Symbol::new("AAPL"), &[]);
        session.clear();
        assert!(session.load().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let (session, _, _) = setup();
        session.record(&Symbol::new("AAPL"), &[]);
        session.record(&Symbol::new("TSLA"), &[Symbol::new("TSLA"), Symbol::new("F")]);
        let state = session.load().unwrap();
        assert_eq!(state.ticker, Symbol::new("TSLA"));
        assert_eq!(state.comparison_symbols.len(), 2);

        session.clear();
        assert!(session.load().is_none());
    }
}
