//! 存储层模块
//!
//! 会话状态只驻留内存，进程结束即丢弃；数据集本身在启动时固化。

pub mod memory;

pub use memory::{InMemorySessionRepository, SessionRepository};
