mod adapters;
mod cli;
mod commands;
mod settings;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::App;
use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
///
/// # Logic
/// 1. 解析命令行并加载配置（默认值 -> 配置文件 -> 环境变量）。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层（行情 API、文件存储）并装配图表子系统。
/// 4. 分派子命令。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config =
        settings::load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // 守卫需存活到进程退出
    let _log_guard = settings::init_tracing(&config.logging);
    info!("Horizon starting...");

    let app = App::new(config)?;
    match cli.command {
        Commands::Chart {
            ticker,
            timeframe,
            compare,
        } => app.chart(ticker, timeframe, compare).await,
        Commands::Search { query } => app.search(&query).await,
        Commands::Last { clear } => app.last(clear),
    }
}
