use horizon_core::chart::entity::ChartSpec;
use horizon_core::chart::error::SelectionError;
use horizon_core::chart::port::{ChartRenderer, DialogView};
use horizon_core::common::Symbol;
use std::io::Write;
use std::sync::Mutex;
use tracing::{info, warn};

/// # Summary
/// 将图表描述以 Chart.js 配置 JSON 输出的渲染适配器，每次渲染输出一行。
pub struct JsonRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> ChartRenderer for JsonRenderer<W> {
    fn render(&self, spec: &ChartSpec) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let written = serde_json::to_writer(&mut *out, spec)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out))
            .and_then(|()| out.flush());
        if let Err(e) = written {
            warn!("Failed to write chart: {}", e);
        }
    }
}

/// # Summary
/// 无界面环境下的对比对话框：把展示请求写入日志。
pub struct LogDialogView;

impl DialogView for LogDialogView {
    fn focus_search(&self) {}

    fn show_selection(&self, symbols: &[Symbol]) {
        info!("Comparing {:?}", symbols);
    }

    fn warn(&self, error: &SelectionError) {
        warn!("{}", error);
    }

    fn close(&self) {}
}
