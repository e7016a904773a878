use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::conversation::ConversationLog;

/// 用户角色
///
/// 只影响助手回复的称呼，不做权限区分。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// 学生
    Student,
    /// 研究人员
    Researcher,
    /// 政策制定者
    #[display("Policy Maker")]
    PolicyMaker,
}

/// 会话实体
///
/// 承载一次仪表盘会话的全部状态：对话日志、角色与最近一次查询。
/// 仅驻留内存，进程结束即丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// 唯一标识，UUID v4
    pub id: String,

    /// 当前用户角色
    pub role: UserRole,

    /// 创建时刻
    pub created_at: DateTime<Utc>,

    /// 最近一次写入日志的时刻
    pub last_active_at: DateTime<Utc>,

    /// 会话日志
    pub log: ConversationLog,

    /// 最近一次自由文本查询
    pub last_query: Option<String>,
}

impl Session {
    /// 以给定角色开一个空会话
    pub fn new(role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            created_at: now,
            last_active_at: now,
            log: ConversationLog::new(),
            last_query: None,
        }
    }

    /// 刷新活跃时刻
    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    /// 日志中的消息数量
    pub fn message_count(&self) -> usize {
        self.log.len()
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}
