//! 聊天服务
//!
//! 处理自由文本查询与预设快捷查询：写入会话日志并生成演示回复。
//! 回复是纯模板文本，不做任何真实检索。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::conversation::{ChatMessage, QuickQuery};
use crate::models::observation::MeasurementField;
use crate::models::session::{Session, UserRole};
use crate::storage::memory::SessionRepository;

/// 一次问答交互写入的消息对
#[derive(Debug, Clone)]
pub struct ChatExchange {
    /// 用户消息
    pub user: ChatMessage,
    /// 助手回复
    pub assistant: ChatMessage,
}

/// 快捷查询应展示的数据视图信号
///
/// 聊天层只声明要展示什么，数据由仪表盘层按信号物化。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickView {
    /// 某年某月的观测行
    MonthTable { year: i32, month: u32 },
    /// 某个度量列按日期的序列
    MeasurementSeries(MeasurementField),
}

/// 快捷查询的结果
#[derive(Debug, Clone)]
pub struct QuickReply {
    /// 写入日志的助手消息
    pub message: ChatMessage,
    /// 应展示的数据视图
    pub view: QuickView,
}

/// 聊天服务 trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// 提交自由文本查询
    ///
    /// 按顺序追加用户消息和助手回复，并更新会话的角色与最近查询。
    async fn submit_query(&self, session_id: &str, role: UserRole, text: &str)
    -> Result<ChatExchange>;

    /// 提交预设快捷查询
    ///
    /// 只追加一条助手消息，不产生用户消息。
    async fn submit_quick_query(&self, session_id: &str, topic: QuickQuery) -> Result<QuickReply>;
}

/// 聊天服务实现
pub struct ChatServiceImpl {
    sessions: Arc<dyn SessionRepository>,
    max_query_length: usize,
}

impl ChatServiceImpl {
    /// 创建新的服务实例
    pub fn new(sessions: Arc<dyn SessionRepository>, max_query_length: usize) -> Self {
        Self {
            sessions,
            max_query_length,
        }
    }
}

fn not_found(session_id: &str) -> AppError {
    AppError::NotFound(format!("Session not found: {}", session_id))
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn submit_query(
        &self,
        session_id: &str,
        role: UserRole,
        text: &str,
    ) -> Result<ChatExchange> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyQuery);
        }
        if text.chars().count() > self.max_query_length {
            return Err(AppError::Validation(format!(
                "Query exceeds {} characters",
                self.max_query_length
            )));
        }

        let user = ChatMessage::user(text);
        let assistant = ChatMessage::assistant(format!(
            "🤖 (Demo) Hi {}, here's some placeholder data for: {}",
            role, text
        ));

        let query = text.to_string();
        let user_entry = user.clone();
        let assistant_entry = assistant.clone();
        self.sessions
            .update_with(
                session_id,
                Box::new(move |session: &mut Session| {
                    session.role = role;
                    session.last_query = Some(query);
                    session.log.append(user_entry);
                    session.log.append(assistant_entry);
                    session.touch();
                }),
            )
            .await?
            .ok_or_else(|| not_found(session_id))?;
        debug!("Query appended to session {}: {} chars", session_id, text.len());

        Ok(ChatExchange { user, assistant })
    }

    async fn submit_quick_query(
        &self,
        session_id: &str,
        topic: QuickQuery,
    ) -> Result<QuickReply> {
        let (reply, view) = match topic {
            QuickQuery::FloatsMarch2023 => (
                "Showing floats for March 2023 (Demo).",
                QuickView::MonthTable {
                    year: 2023,
                    month: 3,
                },
            ),
            QuickQuery::SalinityProfiles => (
                "Showing salinity profiles (Demo).",
                QuickView::MeasurementSeries(MeasurementField::Salinity),
            ),
            QuickQuery::TemperatureTrends => (
                "Showing temperature trends (Demo).",
                QuickView::MeasurementSeries(MeasurementField::Temperature),
            ),
        };

        let message = ChatMessage::assistant(reply);
        let entry = message.clone();
        self.sessions
            .update_with(
                session_id,
                Box::new(move |session: &mut Session| {
                    session.log.append(entry);
                    session.touch();
                }),
            )
            .await?
            .ok_or_else(|| not_found(session_id))?;
        debug!("Quick query {:?} appended to session {}", topic, session_id);

        Ok(QuickReply { message, view })
    }
}

/// 创建聊天服务
pub fn create_chat_service(
    sessions: Arc<dyn SessionRepository>,
    max_query_length: usize,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(sessions, max_query_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::MessageRole;
    use crate::storage::memory::InMemorySessionRepository;

    async fn setup() -> (ChatServiceImpl, String) {
        let repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let session = Session::new(UserRole::Student);
        repo.create(&session).await.unwrap();
        (ChatServiceImpl::new(repo, 1000), session.id)
    }

    async fn stored(service: &ChatServiceImpl, id: &str) -> Session {
        service.sessions.get_by_id(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_submit_query_appends_user_then_assistant() {
        let (service, session_id) = setup().await;

        let exchange = service
            .submit_query(&session_id, UserRole::Student, "Where are the floats?")
            .await
            .unwrap();

        assert_eq!(exchange.user.role, MessageRole::User);
        assert_eq!(exchange.user.content, "Where are the floats?");
        assert_eq!(exchange.assistant.role, MessageRole::Assistant);
        assert_eq!(
            exchange.assistant.content,
            "🤖 (Demo) Hi Student, here's some placeholder data for: Where are the floats?"
        );

        let session = stored(&service, &session_id).await;
        let snapshot = session.log.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, MessageRole::User);
        assert_eq!(snapshot[1].role, MessageRole::Assistant);
        assert_eq!(session.last_query.as_deref(), Some("Where are the floats?"));
    }

    #[tokio::test]
    async fn test_submit_query_uses_role_display_name() {
        let (service, session_id) = setup().await;

        let exchange = service
            .submit_query(&session_id, UserRole::PolicyMaker, "salinity?")
            .await
            .unwrap();

        assert!(
            exchange
                .assistant
                .content
                .starts_with("🤖 (Demo) Hi Policy Maker,")
        );

        let session = stored(&service, &session_id).await;
        assert_eq!(session.role, UserRole::PolicyMaker);
    }

    #[tokio::test]
    async fn test_submit_query_trims_whitespace() {
        let (service, session_id) = setup().await;

        let exchange = service
            .submit_query(&session_id, UserRole::Researcher, "  temperature trends \n")
            .await
            .unwrap();

        assert_eq!(exchange.user.content, "temperature trends");
    }

    #[tokio::test]
    async fn test_submit_query_rejects_empty_text() {
        let (service, session_id) = setup().await;

        let err = service
            .submit_query(&session_id, UserRole::Student, "")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyQuery));

        let err = service
            .submit_query(&session_id, UserRole::Student, "   \t ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EmptyQuery));

        // 拒绝的查询不得写入日志
        let session = stored(&service, &session_id).await;
        assert!(session.log.is_empty());
        assert!(session.last_query.is_none());
    }

    #[tokio::test]
    async fn test_submit_query_rejects_overlong_text() {
        let repo: Arc<dyn SessionRepository> = Arc::new(InMemorySessionRepository::new());
        let session = Session::new(UserRole::Student);
        repo.create(&session).await.unwrap();
        let service = ChatServiceImpl::new(repo, 16);

        let err = service
            .submit_query(&session.id, UserRole::Student, "a query that is definitely too long")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_query_missing_session() {
        let (service, _) = setup().await;
        let err = service
            .submit_query("missing", UserRole::Student, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_quick_query_appends_single_assistant_message() {
        let (service, session_id) = setup().await;

        let reply = service
            .submit_quick_query(&session_id, QuickQuery::SalinityProfiles)
            .await
            .unwrap();

        assert_eq!(reply.message.role, MessageRole::Assistant);
        assert_eq!(reply.message.content, "Showing salinity profiles (Demo).");
        assert_eq!(
            reply.view,
            QuickView::MeasurementSeries(MeasurementField::Salinity)
        );

        let session = stored(&service, &session_id).await;
        let snapshot = session.log.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].role, MessageRole::Assistant);
        // 快捷查询不算自由文本查询
        assert!(session.last_query.is_none());
    }

    #[tokio::test]
    async fn test_quick_query_replies_and_views() {
        let (service, session_id) = setup().await;

        let reply = service
            .submit_quick_query(&session_id, QuickQuery::FloatsMarch2023)
            .await
            .unwrap();
        assert_eq!(reply.message.content, "Showing floats for March 2023 (Demo).");
        assert_eq!(
            reply.view,
            QuickView::MonthTable {
                year: 2023,
                month: 3
            }
        );

        let reply = service
            .submit_quick_query(&session_id, QuickQuery::TemperatureTrends)
            .await
            .unwrap();
        assert_eq!(reply.message.content, "Showing temperature trends (Demo).");
        assert_eq!(
            reply.view,
            QuickView::MeasurementSeries(MeasurementField::Temperature)
        );

        let session = stored(&service, &session_id).await;
        assert_eq!(session.log.len(), 2);
    }
}
