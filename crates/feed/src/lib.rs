//! Horizon 远端行情 API 的 HTTP 数据源实现。

pub mod horizon;
mod parse;
