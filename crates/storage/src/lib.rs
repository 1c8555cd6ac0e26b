//! 本地 KV 存储实现：进程内存与 JSON 文件目录两种介质。

pub mod file;
pub mod mem;
