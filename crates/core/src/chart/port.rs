use crate::chart::entity::ChartSpec;
use crate::chart::error::SelectionError;
use crate::common::Symbol;

/// # Summary
/// 图表渲染适配器接口（外部绘图库）。
///
/// # Invariants
/// - 核心只准备数据与配置，绘制、缩放平移以及数据变化时的销毁重建都由实现者负责。
/// - 每次调用都代表一次完整替换，实现者不得与上一份图表合并。
pub trait ChartRenderer: Send + Sync {
    /// 用新的图表描述替换当前图表。
    fn render(&self, spec: &ChartSpec);
}

/// # Summary
/// 对比对话框的界面端口。
///
/// # Invariants
/// - 只负责展示；所有状态变化由对比状态机驱动。
pub trait DialogView: Send + Sync {
    /// 对话框打开后将焦点移到搜索框
    fn focus_search(&self);

    /// 刷新已选证券列表，首个元素展示为不可移除
    fn show_selection(&self, symbols: &[Symbol]);

    /// 展示行内警告
    fn warn(&self, error: &SelectionError);

    /// 关闭对话框并清空搜索框
    fn close(&self);
}
