use crate::common::Symbol;
use thiserror::Error;

/// # Summary
/// 对比集合编辑错误，即用户违反了集合约束。
///
/// # Invariants
/// - 被拒绝的操作不改变任何状态。
/// - 以行内警告的形式同步反馈给用户。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    // 证券已在集合中
    #[error("Symbol already added: {0}")]
    Duplicate(Symbol),
    // 集合已满
    #[error("Maximum {max} symbols allowed")]
    LimitReached { max: usize },
    // 锚点证券不可移除
    #[error("Cannot remove {0}")]
    AnchorRemoval(Symbol),
    // 要移除的证券不在集合中
    #[error("Symbol not selected: {0}")]
    UnknownSymbol(Symbol),
    // 对比对话框未打开
    #[error("Comparison dialog is not open")]
    NotEditing,
}
