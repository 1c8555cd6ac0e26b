use crate::adapters::{JsonRenderer, LogDialogView};
use anyhow::{Context, Result, bail};
use horizon_chart::card::{ChartCard, ChartCardOptions, ChartDeps, RenderOutcome};
use horizon_chart::fetcher::SeriesFetcher;
use horizon_chart::session::SearchSession;
use horizon_core::chart::port::ChartRenderer;
use horizon_core::common::time::{RealTimeProvider, TimeProvider};
use horizon_core::common::{Symbol, Timeframe};
use horizon_core::config::AppConfig;
use horizon_core::market::port::{PriceHistoryProvider, TickerDirectory};
use horizon_core::storage::port::LocalStorage;
use horizon_feed::horizon::HorizonProvider;
use horizon_storage::file::FileStorage;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 命令执行上下文，持有所有具体实现并以 `Arc<dyn Trait>` 注入图表子系统。
pub struct App {
    config: AppConfig,
    prices: Arc<dyn PriceHistoryProvider>,
    directory: Arc<dyn TickerDirectory>,
    renderer: Arc<dyn ChartRenderer>,
    clock: Arc<dyn TimeProvider>,
    session: SearchSession,
}

impl App {
    /// # Summary
    /// 按配置装配生产实现。
    ///
    /// # Logic
    /// 1. 实例化远端行情 API 客户端，同时充当价格与目录数据源。
    /// 2. 在数据目录下实例化文件存储，作为最近查询的持久化介质。
    /// 3. 图表 JSON 写入 stdout。
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider = Arc::new(HorizonProvider::new(&config.api)?);
        let storage = Arc::new(
            FileStorage::new(&config.storage.data_dir)
                .with_context(|| format!("Cannot open data dir {}", config.storage.data_dir))?,
        );

        Ok(Self::from_parts(
            config,
            provider.clone(),
            provider,
            Arc::new(JsonRenderer::stdout()),
            storage,
            Arc::new(RealTimeProvider),
        ))
    }

    pub fn from_parts(
        config: AppConfig,
        prices: Arc<dyn PriceHistoryProvider>,
        directory: Arc<dyn TickerDirectory>,
        renderer: Arc<dyn ChartRenderer>,
        storage: Arc<dyn LocalStorage>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let session = SearchSession::new(storage, clock.clone());
        Self {
            config,
            prices,
            directory,
            renderer,
            clock,
            session,
        }
    }

    /// # Summary
    /// `chart` 命令：渲染证券图表，可附带对比集合。
    ///
    /// # Logic
    /// 1. 未指定证券时恢复最近一次查询（含对比集合）。
    /// 2. 只有普通股 (`CS`) 才渲染图表。
    /// 3. 无额外对比证券时直接首次渲染并记录本次查询。
    /// 4. 否则走 打开对话框 -> 逐个选择 -> 应用 的流程，应用时自动记录。
    pub async fn chart(
        &self,
        ticker: Option<Symbol>,
        timeframe: Option<Timeframe>,
        compare: Vec<Symbol>,
    ) -> Result<()> {
        let (ticker, restored) = match ticker {
            Some(ticker) => (ticker, Vec::new()),
            None => {
                let last = self
                    .session
                    .load()
                    .context("No ticker given and no recent search to restore")?;
                info!("Restoring last search {}", last.ticker);
                (last.ticker, last.comparison_symbols)
            }
        };

        let overview = self
            .directory
            .overview(&ticker)
            .await
            .with_context(|| format!("Failed to load overview for {}", ticker))?;
        if !overview.is_common_stock() {
            bail!(
                "{} is not a common stock (type {})",
                ticker,
                overview.kind.as_deref().unwrap_or("unknown")
            );
        }
        info!(
            "Charting {} ({})",
            ticker,
            overview.name.as_deref().unwrap_or("-")
        );

        let card = ChartCard::new(ticker.clone(), &restored, self.card_options(timeframe), self.deps());
        let outcome = if compare.is_empty() {
            let outcome = card.load().await;
            self.session.record(&ticker, &card.applied());
            outcome
        } else {
            card.open_dialog();
            let rejected = compare
                .into_iter()
                .filter_map(|symbol| card.select_symbol(symbol).err())
                .count();
            if rejected > 0 {
                warn!("{} comparison symbol(s) skipped", rejected);
            }
            card.apply_dialog().await?
        };

        match outcome {
            RenderOutcome::Rendered(_) | RenderOutcome::Stale => Ok(()),
            RenderOutcome::Empty => bail!("No price data for {}", ticker),
        }
    }

    /// `search` 命令：每行输出一个候选证券。
    pub async fn search(&self, query: &str) -> Result<()> {
        let matches = self
            .directory
            .search(query, self.config.api.search_limit)
            .await?;
        if matches.is_empty() {
            println!("No matches for '{}'", query);
        }
        for m in matches {
            println!(
                "{}\t{}\t{}",
                m.ticker,
                m.name.unwrap_or_default(),
                m.primary_exchange.unwrap_or_default()
            );
        }
        Ok(())
    }

    /// `last` 命令：展示或清除最近一次查询。
    pub fn last(&self, clear: bool) -> Result<()> {
        if clear {
            self.session.clear();
            info!("Last search cleared");
            return Ok(());
        }
        match self.session.load() {
            Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
            None => println!("No recent search"),
        }
        Ok(())
    }

    fn card_options(&self, timeframe: Option<Timeframe>) -> ChartCardOptions {
        ChartCardOptions {
            timeframe: timeframe.unwrap_or(self.config.chart.default_timeframe),
            max_symbols: self.config.chart.max_comparison_symbols,
        }
    }

    fn deps(&self) -> ChartDeps {
        ChartDeps {
            fetcher: SeriesFetcher::new(
                self.prices.clone(),
                self.clock.clone(),
                self.config.api.aggregate_limit,
            ),
            renderer: self.renderer.clone(),
            view: Arc::new(LogDialogView),
            session: self.session.clone(),
        }
    }
}
