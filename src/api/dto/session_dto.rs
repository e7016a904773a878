//! 会话 DTO
//!
//! 会话接口的请求与响应结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::{Session, UserRole};

/// 创建会话请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct CreateSessionRequest {
    /// 用户角色，缺省为 student
    pub role: Option<UserRole>,
}

/// 创建会话响应
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// 新会话的标识
    pub id: String,
    /// 用户角色
    pub role: UserRole,
    /// 创建时刻
    pub created_at: DateTime<Utc>,
}

/// 会话详情响应
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// 会话标识
    pub id: String,
    /// 用户角色
    pub role: UserRole,
    /// 创建时刻
    pub created_at: DateTime<Utc>,
    /// 最近活跃时刻
    pub last_active_at: DateTime<Utc>,
    /// 日志中的消息数
    pub message_count: usize,
    /// 最近一次自由文本查询
    pub last_query: Option<String>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let message_count = session.message_count();
        Self {
            id: session.id,
            role: session.role,
            created_at: session.created_at,
            last_active_at: session.last_active_at,
            message_count,
            last_query: session.last_query,
        }
    }
}

/// 会话列表响应
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    /// 当前页的会话
    pub sessions: Vec<SessionResponse>,
    /// 会话总数
    pub total: usize,
    /// 页码
    pub page: usize,
    /// 每页条数
    pub page_size: usize,
}

/// 删除会话响应
#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    /// 被删除的会话标识
    pub id: String,
    /// 结果说明
    pub message: String,
}
