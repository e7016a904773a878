//! 聊天 DTO
//!
//! 定义聊天相关的请求数据结构，响应直接使用视图模型。

use serde::Deserialize;

use crate::models::conversation::QuickQuery;
use crate::models::session::UserRole;

/// 提交自由文本查询请求
#[derive(Debug, Deserialize)]
pub struct SubmitQueryRequest {
    /// 用户角色，缺省沿用默认角色
    #[serde(default)]
    pub role: Option<UserRole>,
    /// 查询文本
    pub text: String,
}

/// 快捷查询请求
#[derive(Debug, Deserialize)]
pub struct QuickQueryRequest {
    /// 快捷查询主题
    pub topic: QuickQuery,
}
