use config::{Config, ConfigError, Environment, File};
use horizon_core::config::{AppConfig, LoggingConfig};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// 默认配置文件名（不含扩展名），位于工作目录
const DEFAULT_CONFIG_FILE: &str = "horizon";

/// 环境变量前缀，例如 `HORIZON__API__BASE_URL`
const ENV_PREFIX: &str = "HORIZON";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig` 的默认值为基础。
/// 2. 叠加配置文件：显式路径必须存在，默认的 `horizon.toml` 可缺失。
/// 3. 叠加 `HORIZON__` 前缀的环境变量，层级以 `__` 分隔。
///
/// # Arguments
/// * `path`: 命令行指定的配置文件路径。
///
/// # Returns
/// 合并后的配置。
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. 过滤级别优先取 `RUST_LOG`，其次取配置，最后默认 `info`。
/// 2. 日志输出到 stderr，stdout 留给命令结果。
/// 3. 配置了日志目录时额外按天滚动写入文件。
///
/// # Returns
/// 文件日志的后台写入守卫；需持有到进程退出，否则缓冲日志会丢失。
pub fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let level = logging.level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match logging.dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "horizon.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::common::Timeframe;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:9000\"\n\n[chart]\ndefault_timeframe = \"6m\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.aggregate_limit, 730);
        assert_eq!(config.chart.default_timeframe, Timeframe::SixMonths);
        assert_eq!(config.storage.data_dir, "data");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
