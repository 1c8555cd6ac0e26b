use horizon_core::chart::error::SelectionError;
use horizon_core::common::Symbol;

/// 对比集合的默认容量（含锚点）。
pub const MAX_COMPARISON_SYMBOLS: usize = 4;

/// # Summary
/// 对比对话框所处的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    // 对话框关闭，图表展示 `applied`
    Idle,
    // 对话框打开，`selected` 可编辑且与 `applied` 相互独立
    Editing,
}

/// # Summary
/// 对比集合状态机，区分“对话框中已选择”与“图表上已应用”两份集合。
///
/// # Invariants
/// - 两份集合的首个元素都是锚点，锚点不可移除。
/// - `1 <= len <= max_symbols`，且不含重复证券。
/// - 被拒绝的操作不改变任何状态。
/// - 不依赖任何界面框架，可独立测试。
#[derive(Debug, Clone)]
pub struct ComparisonState {
    // 当前图表上应用的集合
    applied: Vec<Symbol>,
    // 编辑中的集合；Some 即处于 Editing 状态
    selected: Option<Vec<Symbol>>,
    max_symbols: usize,
}

impl ComparisonState {
    /// # Summary
    /// 以锚点证券创建状态机，初始只对比锚点自身。
    ///
    /// # Arguments
    /// * `anchor`: 最初搜索的证券。
    /// * `max_symbols`: 集合容量上限，小于 1 时按 1 处理。
    pub fn new(anchor: Symbol, max_symbols: usize) -> Self {
        Self {
            applied: vec![anchor],
            selected: None,
            max_symbols: max_symbols.max(1),
        }
    }

    /// # Summary
    /// 从持久化记录恢复已应用的集合。
    ///
    /// # Logic
    /// 1. 锚点强制放在首位。
    /// 2. 依次追加其余证券，跳过重复项与锚点自身。
    /// 3. 超出容量的部分被截断。
    pub fn restore(anchor: Symbol, symbols: &[Symbol], max_symbols: usize) -> Self {
        let mut state = Self::new(anchor, max_symbols);
        for symbol in symbols {
            if state.applied.len() >= state.max_symbols {
                break;
            }
            if !state.applied.contains(symbol) {
                state.applied.push(symbol.clone());
            }
        }
        state
    }

    pub fn anchor(&self) -> &Symbol {
        &self.applied[0]
    }

    pub fn applied(&self) -> &[Symbol] {
        &self.applied
    }

    /// 编辑中的集合；对话框关闭时为 None。
    pub fn selected(&self) -> Option<&[Symbol]> {
        self.selected.as_deref()
    }

    pub fn max_symbols(&self) -> usize {
        self.max_symbols
    }

    pub fn state(&self) -> DialogState {
        if self.selected.is_some() {
            DialogState::Editing
        } else {
            DialogState::Idle
        }
    }

    /// 图表上是否有锚点之外的证券。
    pub fn is_comparing(&self) -> bool {
        self.applied.len() > 1
    }

    /// # Summary
    /// 打开对话框：Idle -> Editing。
    ///
    /// # Logic
    /// 以当前已应用集合的副本初始化编辑集合。已在编辑中时重新开始编辑。
    ///
    /// # Returns
    /// 需要在对话框中展示的集合。
    pub fn open(&mut self) -> &[Symbol] {
        self.selected.insert(self.applied.clone()).as_slice()
    }

    /// # Summary
    /// 向编辑集合追加证券。
    ///
    /// # Logic
    /// 1. 未处于编辑状态时拒绝。
    /// 2. 集合已满时拒绝。
    /// 3. 证券已存在时拒绝。
    /// 4. 否则追加到末尾。
    ///
    /// # Returns
    /// 成功返回更新后的编辑集合，失败返回 `SelectionError` 且状态不变。
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<&[Symbol], SelectionError> {
        let max = self.max_symbols;
        let selected = self.selected.as_mut().ok_or(SelectionError::NotEditing)?;
        if selected.len() >= max {
            return Err(SelectionError::LimitReached { max });
        }
        if selected.contains(&symbol) {
            return Err(SelectionError::Duplicate(symbol));
        }
        selected.push(symbol);
        Ok(selected.as_slice())
    }

    /// # Summary
    /// 从编辑集合移除证券。
    ///
    /// # Logic
    /// 1. 未处于编辑状态时拒绝。
    /// 2. 目标是首个元素（锚点）时无条件拒绝。
    /// 3. 移除第一个匹配项；不存在时拒绝。
    pub fn remove_symbol(&mut self, symbol: &Symbol) -> Result<&[Symbol], SelectionError> {
        let selected = self.selected.as_mut().ok_or(SelectionError::NotEditing)?;
        if selected.first() == Some(symbol) {
            return Err(SelectionError::AnchorRemoval(symbol.clone()));
        }
        let idx = selected
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| SelectionError::UnknownSymbol(symbol.clone()))?;
        selected.remove(idx);
        Ok(selected.as_slice())
    }

    /// # Summary
    /// 取消编辑：Editing -> Idle，丢弃编辑集合，已应用集合不变。
    ///
    /// # Returns
    /// 确实丢弃了编辑内容时返回 true。
    pub fn cancel(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// # Summary
    /// 应用编辑：Editing -> Idle，编辑集合成为新的已应用集合。
    ///
    /// # Returns
    /// 新的已应用集合；未处于编辑状态时返回 `NotEditing`。
    pub fn apply(&mut self) -> Result<&[Symbol], SelectionError> {
        let selected = self.selected.take().ok_or(SelectionError::NotEditing)?;
        self.applied = selected;
        Ok(self.applied.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(list: &[&str]) -> Vec<Symbol> {
        list.iter().map(Symbol::new).collect()
    }

    fn editing(list: &[&str]) -> ComparisonState {
        let symbols = syms(list);
        let mut state =
            ComparisonState::restore(symbols[0].clone(), &symbols, MAX_COMPARISON_SYMBOLS);
        state.open();
        state
    }

    #[test]
    fn test_open_copies_applied() {
        let mut state = ComparisonState::new(Symbol::new("AAPL"), MAX_COMPARISON_SYMBOLS);
        assert_eq!(state.state(), DialogState::Idle);
        assert!(state.selected().is_none());

        assert_eq!(state.open(), syms(&["AAPL"]).as_slice());
        assert_eq!(state.state(), DialogState::Editing);
    }

    #[test]
    fn test_add_rejects_when_full() {
        let mut state = editing(&["AAPL", "MSFT", "GOOG", "TSLA"]);
        let err = state.add_symbol(Symbol::new("AAPL")).unwrap_err();
        assert_eq!(err, SelectionError::LimitReached { max: 4 });
        assert_eq!(
            state.selected().unwrap(),
            syms(&["AAPL", "MSFT", "GOOG", "TSLA"]).as_slice()
        );
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut state = editing(&["AAPL", "MSFT"]);
        let err = state.add_symbol(Symbol::new("msft")).unwrap_err();
        assert_eq!(err, SelectionError::Duplicate(Symbol::new("MSFT")));
        assert_eq!(state.selected().unwrap().len(), 2);
    }

    #[test]
    fn test_add_never_exceeds_max_or_duplicates() {
        let mut state = editing(&["AAPL"]);
        for s in ["MSFT", "AAPL", "GOOG", "MSFT", "TSLA", "NVDA", "AMZN"] {
            let _accepted = state.add_symbol(Symbol::new(s)).is_ok();
            let selected = state.selected().unwrap();
            assert!(selected.len() <= MAX_COMPARISON_SYMBOLS);
            let mut dedup = selected.to_vec();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), selected.len());
        }
        assert_eq!(
            state.selected().unwrap(),
            syms(&["AAPL", "MSFT", "GOOG", "TSLA"]).as_slice()
        );
    }

    #[test]
    fn test_remove_anchor_is_rejected() {
        let mut state = editing(&["AAPL", "MSFT"]);
        let err = state.remove_symbol(&Symbol::new("AAPL")).unwrap_err();
        assert_eq!(err, SelectionError::AnchorRemoval(Symbol::new("AAPL")));
        assert_eq!(state.selected().unwrap(), syms(&["AAPL", "MSFT"]).as_slice());
    }

    #[test]
    fn test_remove_symbol() {
        let mut state = editing(&["AAPL", "MSFT", "GOOG"]);
        let selected = state.remove_symbol(&Symbol::new("MSFT")).unwrap();
        assert_eq!(selected, syms(&["AAPL", "GOOG"]).as_slice());

        let err = state.remove_symbol(&Symbol::new("MSFT")).unwrap_err();
        assert_eq!(err, SelectionError::UnknownSymbol(Symbol::new("MSFT")));
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut state = ComparisonState::new(Symbol::new("AAPL"), MAX_COMPARISON_SYMBOLS);
        state.open();
        state.add_symbol(Symbol::new("MSFT")).unwrap();

        assert!(state.cancel());
        assert_eq!(state.state(), DialogState::Idle);
        assert_eq!(state.applied(), syms(&["AAPL"]).as_slice());
        assert!(!state.cancel());

        // 重新打开后编辑集合回到已应用集合
        assert_eq!(state.open(), syms(&["AAPL"]).as_slice());
    }

    #[test]
    fn test_apply_commits_selection() {
        let mut state = ComparisonState::new(Symbol::new("AAPL"), MAX_COMPARISON_SYMBOLS);
        state.open();
        state.add_symbol(Symbol::new("MSFT")).unwrap();

        assert_eq!(state.apply().unwrap(), syms(&["AAPL", "MSFT"]).as_slice());
        assert_eq!(state.state(), DialogState::Idle);
        assert!(state.is_comparing());
        assert_eq!(state.apply().unwrap_err(), SelectionError::NotEditing);
    }

    #[test]
    fn test_operations_require_editing() {
        let mut state = ComparisonState::new(Symbol::new("AAPL"), MAX_COMPARISON_SYMBOLS);
        assert_eq!(
            state.add_symbol(Symbol::new("MSFT")).unwrap_err(),
            SelectionError::NotEditing
        );
        assert_eq!(
            state.remove_symbol(&Symbol::new("MSFT")).unwrap_err(),
            SelectionError::NotEditing
        );
        assert_eq!(state.applied(), syms(&["AAPL"]).as_slice());
    }

    #[test]
    fn test_restore_sanitizes() {
        let state = ComparisonState::restore(
            Symbol::new("MSFT"),
            &syms(&["AAPL", "MSFT", "AAPL", "GOOG", "TSLA", "NVDA"]),
            MAX_COMPARISON_SYMBOLS,
        );
        assert_eq!(state.anchor(), &Symbol::new("MSFT"));
        assert_eq!(state.applied(), syms(&["MSFT", "AAPL", "GOOG", "TSLA"]).as_slice());
        assert_eq!(state.state(), DialogState::Idle);
    }

    #[test]
    fn test_restore_dedups_deserialized_symbols() {
        let stored: Vec<Symbol> = serde_json::from_str(r#"[" aapl", "msft ", "MSFT"]"#).unwrap();
        let state = ComparisonState::restore(Symbol::new("AAPL"), &stored, MAX_COMPARISON_SYMBOLS);
        assert_eq!(state.applied(), syms(&["AAPL", "MSFT"]).as_slice());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut state = ComparisonState::new(Symbol::new("AAPL"), 0);
        assert_eq!(state.max_symbols(), 1);
        state.open();
        assert!(state.add_symbol(Symbol::new("MSFT")).is_err());
    }
}
