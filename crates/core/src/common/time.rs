use chrono::{DateTime, NaiveDate, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// # Summary
/// 时钟接口，用于隔离物理系统时钟。
/// 请求日期区间的计算与最近查询的新鲜度判定都通过此接口取时间。
pub trait TimeProvider: Send + Sync {
    /// 当前 UTC 时间
    fn now(&self) -> DateTime<Utc>;

    /// 当前时间的毫秒级 Unix 时间戳
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// 当前 UTC 日期，作为请求日期区间的终点
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// 操作系统时钟。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 测试用手动时钟，只在调用 `advance` 时前进。
///
/// # Invariants
/// - 内部以毫秒时间戳保存于 `AtomicI64`，可跨线程共享。
pub struct FakeClockProvider {
    now_ms: AtomicI64,
}

impl FakeClockProvider {
    pub fn new(initial_time: DateTime<Utc>) -> Self {
        Self {
            now_ms: AtomicI64::new(initial_time.timestamp_millis()),
        }
    }

    /// 将时钟拨动指定时长，负值表示回退
    pub fn advance(&self, delta: chrono::Duration) {
        self.now_ms
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_ms()).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
