use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// 用户消息
    User,
    /// 助手消息
    Assistant,
}

/// 会话消息
///
/// 只在创建时赋值，入日志后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// 消息角色
    pub role: MessageRole,

    /// 消息内容
    pub content: String,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// 创建用户消息
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// 创建助手消息
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// 会话日志
///
/// 追加式消息序列，保持插入顺序，不支持删除或改写。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    /// 创建空日志
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条消息
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// 按插入顺序克隆全部消息
    ///
    /// 返回的快照与日志相互独立，可以反复遍历。
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// 消息数量
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// 日志是否为空
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// 预设快捷查询主题
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuickQuery {
    /// 2023 年 3 月的浮标
    #[serde(rename = "floats_march_2023")]
    FloatsMarch2023,
    /// 盐度剖面
    #[serde(rename = "salinity_profiles")]
    SalinityProfiles,
    /// 温度趋势
    #[serde(rename = "temperature_trends")]
    TemperatureTrends,
}

impl QuickQuery {
    /// 全部快捷查询主题，顺序与页面按钮一致
    pub const ALL: [QuickQuery; 3] = [
        QuickQuery::FloatsMarch2023,
        QuickQuery::SalinityProfiles,
        QuickQuery::TemperatureTrends,
    ];

    /// 按钮文案
    pub fn label(&self) -> &'static str {
        match self {
            QuickQuery::FloatsMarch2023 => "Show floats in March 2023",
            QuickQuery::SalinityProfiles => "Show salinity profiles",
            QuickQuery::TemperatureTrends => "Show temperature trends",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.append(ChatMessage::user("first"));
        log.append(ChatMessage::assistant("second"));
        log.append(ChatMessage::assistant("third"));

        let snapshot = log.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].content, "first");
        assert_eq!(snapshot[0].role, MessageRole::User);
        assert_eq!(snapshot[1].content, "second");
        assert_eq!(snapshot[2].content, "third");
        assert_eq!(snapshot[2].role, MessageRole::Assistant);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_appends() {
        let mut log = ConversationLog::new();
        log.append(ChatMessage::user("hello"));

        let snapshot = log.snapshot();
        log.append(ChatMessage::assistant("world"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);

        // 快照可以反复遍历
        let first_pass: Vec<_> = snapshot.iter().map(|m| m.content.clone()).collect();
        let second_pass: Vec<_> = snapshot.iter().map(|m| m.content.clone()).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_empty_log_snapshot() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn test_quick_query_wire_names() {
        let json = serde_json::to_string(&QuickQuery::FloatsMarch2023).unwrap();
        assert_eq!(json, "\"floats_march_2023\"");
        let parsed: QuickQuery = serde_json::from_str("\"salinity_profiles\"").unwrap();
        assert_eq!(parsed, QuickQuery::SalinityProfiles);
    }
}
