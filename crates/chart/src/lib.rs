//! # Horizon Chart
//!
//! 对比图表子系统：抓取边界、序列对齐、对比集合状态机、
//! 图表数据整形以及最近查询的持久化。

pub mod align;
pub mod card;
pub mod compare;
pub mod fetcher;
pub mod render;
pub mod session;
