//! FloatChat - 海洋浮标数据对话式演示仪表盘服务
//!
//! 围绕固定的五行 ARGO 浮标样例数据提供会话日志、演示回复、
//! 过滤查询与 CSV 导出能力，供前端渲染演示仪表盘。

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
