//! # Horizon Core
//!
//! 股票对比图表引擎的领域层：实体、端口 (Trait) 与错误定义。
//! 具体实现 (HTTP 数据源、本地存储、图表流水线) 位于各自的 crate 中。

pub mod chart;
pub mod common;
pub mod config;
pub mod market;
pub mod storage;
