use crate::align::{SymbolSeries, align, align_single};
use crate::compare::{ComparisonState, DialogState, MAX_COMPARISON_SYMBOLS};
use crate::fetcher::SeriesFetcher;
use crate::render::{comparison_chart, single_chart};
use crate::session::SearchSession;
use futures::future::join_all;
use horizon_core::chart::entity::ChartSpec;
use horizon_core::chart::error::SelectionError;
use horizon_core::chart::port::{ChartRenderer, DialogView};
use horizon_core::common::{Symbol, Timeframe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// # Summary
/// 图表卡片的外部协作者集合。
#[derive(Clone)]
pub struct ChartDeps {
    pub fetcher: SeriesFetcher,
    pub renderer: Arc<dyn ChartRenderer>,
    pub view: Arc<dyn DialogView>,
    pub session: SearchSession,
}

/// # Summary
/// 图表卡片的初始参数。
#[derive(Debug, Clone, Copy)]
pub struct ChartCardOptions {
    pub timeframe: Timeframe,
    pub max_symbols: usize,
}

impl Default for ChartCardOptions {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            max_symbols: MAX_COMPARISON_SYMBOLS,
        }
    }
}

/// # Summary
/// 一次 抓取 -> 对齐 -> 渲染 周期的结果。
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    // 已交给渲染适配器
    Rendered(ChartSpec),
    // 首次渲染或切换时间窗口时单证券没有数据，保留原图表
    Empty,
    // 周期完成前已有更新的周期开始，结果被丢弃
    Stale,
}

impl RenderOutcome {
    /// 已渲染的图表描述；未渲染时为 None。
    pub fn into_spec(self) -> Option<ChartSpec> {
        match self {
            RenderOutcome::Rendered(spec) => Some(spec),
            RenderOutcome::Empty | RenderOutcome::Stale => None,
        }
    }
}

/// 单证券周期抓到空序列时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnEmpty {
    // 不调用渲染适配器，屏幕上的图表保持不变
    KeepChart,
    // 仍然渲染空数据集，使图表与已应用集合一致
    Render,
}

/// # Summary
/// 单个已渲染证券的图表上下文，持有对比状态机并驱动数据流水线。
///
/// # Invariants
/// - 每次宿主渲染新的证券时重新创建，旧实例随之丢弃。
/// - 渲染代数单调递增；只有代数仍为最新的周期才能调用渲染适配器。
/// - 状态锁从不跨越 `.await` 持有。
pub struct ChartCard {
    deps: ChartDeps,
    // 对比集合状态机
    comparison: Mutex<ComparisonState>,
    // 当前生效的时间窗口
    timeframe: Mutex<Timeframe>,
    // 渲染代数
    generation: AtomicU64,
}

impl ChartCard {
    /// # Summary
    /// 创建图表卡片。
    ///
    /// # Logic
    /// 1. 以 `initial` 恢复已应用的对比集合（锚点始终在首位，超出容量截断）。
    /// 2. 记录初始时间窗口，此时尚未发起任何请求。
    ///
    /// # Arguments
    /// * `anchor`: 搜索的证券。
    /// * `initial`: 从本地存储恢复的对比集合，可为空。
    /// * `options`: 初始时间窗口与集合容量。
    /// * `deps`: 外部协作者。
    pub fn new(
        anchor: Symbol,
        initial: &[Symbol],
        options: ChartCardOptions,
        deps: ChartDeps,
    ) -> Self {
        Self {
            deps,
            comparison: Mutex::new(ComparisonState::restore(anchor, initial, options.max_symbols)),
            timeframe: Mutex::new(options.timeframe),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ComparisonState> {
        self.comparison.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn anchor(&self) -> Symbol {
        self.state().anchor().clone()
    }

    pub fn applied(&self) -> Vec<Symbol> {
        self.state().applied().to_vec()
    }

    pub fn selected(&self) -> Option<Vec<Symbol>> {
        self.state().selected().map(<[_]>::to_vec)
    }

    pub fn dialog_state(&self) -> DialogState {
        self.state().state()
    }

    pub fn timeframe(&self) -> Timeframe {
        *self.timeframe.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// # Summary
    /// 首次渲染：按已应用集合与初始时间窗口执行一次完整周期。
    pub async fn load(&self) -> RenderOutcome {
        let symbols = self.applied();
        self.refresh(&symbols, self.timeframe(), OnEmpty::KeepChart).await
    }

    /// # Summary
    /// 打开对比对话框。
    ///
    /// # Logic
    /// 1. 以已应用集合初始化编辑集合。
    /// 2. 刷新对话框列表并请求搜索框焦点。
    pub fn open_dialog(&self) {
        let selected = self.state().open().to_vec();
        self.deps.view.show_selection(&selected);
        self.deps.view.focus_search();
    }

    /// # Summary
    /// 搜索框选中回调：将证券加入编辑集合。
    ///
    /// # Returns
    /// 被拒绝时返回 `SelectionError`，同时通过对话框展示警告。
    pub fn select_symbol(&self, symbol: Symbol) -> Result<(), SelectionError> {
        let result = self.state().add_symbol(symbol).map(<[_]>::to_vec);
        self.present(result)
    }

    /// 从编辑集合中移除证券；锚点不可移除。
    pub fn remove_symbol(&self, symbol: &Symbol) -> Result<(), SelectionError> {
        let result = self.state().remove_symbol(symbol).map(<[_]>::to_vec);
        self.present(result)
    }

    fn present(&self, result: Result<Vec<Symbol>, SelectionError>) -> Result<(), SelectionError> {
        match result {
            Ok(selected) => {
                self.deps.view.show_selection(&selected);
                Ok(())
            }
            Err(e) => {
                debug!("Selection rejected: {}", e);
                self.deps.view.warn(&e);
                Err(e)
            }
        }
    }

    /// 关闭对话框并丢弃编辑内容，图表保持不变。
    pub fn cancel_dialog(&self) {
        if self.state().cancel() {
            debug!("Comparison edit discarded");
        }
        self.deps.view.close();
    }

    /// # Summary
    /// 应用编辑集合。
    ///
    /// # Logic
    /// 1. 编辑集合成为新的已应用集合，关闭对话框。
    /// 2. 持久化锚点与新集合。
    /// 3. 以当前时间窗口为集合中所有证券执行 抓取 -> 对齐 -> 渲染。
    ///    集合缩减为只有锚点且锚点无数据时也会渲染，旧的对比图不会残留。
    ///
    /// # Returns
    /// 渲染结果；对话框未打开时返回 `NotEditing`。
    pub async fn apply_dialog(&self) -> Result<RenderOutcome, SelectionError> {
        let (anchor, applied) = {
            let mut state = self.state();
            let applied = state.apply()?.to_vec();
            (state.anchor().clone(), applied)
        };
        self.deps.view.close();
        info!("Applying comparison {:?}", applied);

        self.deps.session.record(&anchor, &applied);
        Ok(self
            .refresh(&applied, self.timeframe(), OnEmpty::Render)
            .await)
    }

    /// # Summary
    /// 切换时间窗口并重新渲染当前已应用的集合。
    ///
    /// # Logic
    /// 不打开对话框，也不改变编辑状态；集合只有锚点时走单证券路径。
    pub async fn set_timeframe(&self, timeframe: Timeframe) -> RenderOutcome {
        *self.timeframe.lock().unwrap_or_else(|e| e.into_inner()) = timeframe;
        let symbols = self.applied();
        self.refresh(&symbols, timeframe, OnEmpty::KeepChart).await
    }

    /// # Summary
    /// 执行一次 抓取 -> 对齐 -> 渲染 周期。
    ///
    /// # Logic
    /// 1. 领取新的渲染代数。
    /// 2. 单证券：抓取后直接作为时间轴；无数据时按 `on_empty` 决定是否渲染。
    /// 3. 多证券：并发抓取全部证券，对齐后按集合顺序生成数据集。
    /// 4. 抓取完成后若代数已过期则丢弃结果。
    async fn refresh(
        &self,
        symbols: &[Symbol],
        timeframe: Timeframe,
        on_empty: OnEmpty,
    ) -> RenderOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Render cycle #{} for {:?} ({})",
            generation, symbols, timeframe
        );

        let spec = match symbols {
            [] => return RenderOutcome::Empty,
            [symbol] => {
                let points = self.deps.fetcher.fetch(symbol, timeframe).await;
                if !self.is_current(generation) {
                    return RenderOutcome::Stale;
                }
                if points.is_empty() {
                    if on_empty == OnEmpty::KeepChart {
                        warn!("No price data for {} ({}), chart left unchanged", symbol, timeframe);
                        return RenderOutcome::Empty;
                    }
                    warn!("No price data for {} ({}), rendering empty chart", symbol, timeframe);
                }
                single_chart(symbol, &align_single(symbol, &points))
            }
            _ => {
                let fetches = symbols
                    .iter()
                    .map(|symbol| self.deps.fetcher.fetch(symbol, timeframe));
                let results = join_all(fetches).await;
                if !self.is_current(generation) {
                    return RenderOutcome::Stale;
                }
                let series: SymbolSeries = symbols.iter().cloned().zip(results).collect();
                comparison_chart(symbols, &align(&series))
            }
        };

        info!(
            "Rendering {} dataset(s) over {} point(s)",
            spec.data.datasets.len(),
            spec.data.labels.len()
        );
        self.deps.renderer.render(&spec);
        RenderOutcome::Rendered(spec)
    }

    fn is_current(&self, generation: u64) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            debug!("Discarding render cycle #{} (current #{})", generation, current);
            return false;
        }
        true
    }
}
