//! 会话服务
//!
//! 提供会话的 CRUD 操作与会话日志的读写入口。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::conversation::ChatMessage;
use crate::models::session::{Session, UserRole};
use crate::storage::memory::SessionRepository;

/// 分页参数
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Pagination {
    /// 页码（从 1 开始）
    pub page: usize,
    /// 每页数量
    pub page_size: usize,
}

impl Pagination {
    /// 创建新分页参数
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// 计算偏移量
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1)) * self.page_size
    }

    /// 页码和每页数量都必须大于 0
    pub fn is_valid(&self) -> bool {
        self.page > 0 && self.page_size > 0
    }
}

/// 会话列表查询参数
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionQuery {
    /// 分页参数
    pub pagination: Pagination,
}

/// 会话服务 trait
#[async_trait]
pub trait SessionService: Send + Sync {
    /// 创建会话
    async fn create(&self, role: Option<UserRole>) -> Result<Session>;

    /// 根据 ID 获取会话
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// 删除会话
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 列出会话
    async fn list(&self, query: SessionQuery) -> Result<Vec<Session>>;

    /// 统计会话数量
    async fn count(&self) -> Result<u64>;

    /// 向会话日志追加一条消息
    async fn append_message(&self, id: &str, message: ChatMessage) -> Result<Session>;

    /// 按插入顺序获取会话日志快照
    async fn snapshot(&self, id: &str) -> Result<Vec<ChatMessage>>;
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Session not found: {}", id))
}

/// 会话服务实现
pub struct SessionServiceImpl {
    repository: Arc<dyn SessionRepository>,
}

impl SessionServiceImpl {
    /// 创建新的服务实例
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 取会话，不存在则报 NotFound
    async fn require(&self, id: &str) -> Result<Session> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl SessionService for SessionServiceImpl {
    async fn create(&self, role: Option<UserRole>) -> Result<Session> {
        let session = Session::new(role.unwrap_or_default());
        self.repository.create(&session).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        self.repository.get_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        // 删除不存在的会话视为错误
        self.require(id).await?;
        self.repository.delete(id).await
    }

    async fn list(&self, query: SessionQuery) -> Result<Vec<Session>> {
        if !query.pagination.is_valid() {
            return Err(AppError::Validation(
                "page and page_size must be greater than zero".to_string(),
            ));
        }

        let offset = query.pagination.offset();
        self.repository.list(query.pagination.page_size, offset).await
    }

    async fn count(&self) -> Result<u64> {
        self.repository.count().await
    }

    async fn append_message(&self, id: &str, message: ChatMessage) -> Result<Session> {
        self.repository
            .update_with(
                id,
                Box::new(move |session: &mut Session| {
                    session.log.append(message);
                    session.touch();
                }),
            )
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn snapshot(&self, id: &str) -> Result<Vec<ChatMessage>> {
        Ok(self.require(id).await?.log.snapshot())
    }
}

/// 创建会话服务
pub fn create_session_service(repository: Arc<dyn SessionRepository>) -> Box<dyn SessionService> {
    Box::new(SessionServiceImpl::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::MessageRole;
    use crate::storage::memory::InMemorySessionRepository;

    fn service() -> SessionServiceImpl {
        SessionServiceImpl::new(Arc::new(InMemorySessionRepository::new()))
    }

    #[test]
    fn test_pagination_offset() {
        for (page, page_size, offset) in [(1, 20, 0), (2, 20, 20), (3, 10, 20), (0, 10, 0)] {
            assert_eq!(Pagination::new(page, page_size).offset(), offset);
        }
    }

    #[test]
    fn test_pagination_validity() {
        assert!(!Pagination::new(0, 20).is_valid());
        assert!(!Pagination::new(1, 0).is_valid());
        assert!(Pagination::new(1, 20).is_valid());
    }

    #[tokio::test]
    async fn test_create_uses_default_role() {
        let service = service();
        let session = service.create(None).await.unwrap();
        assert_eq!(session.role, UserRole::Student);
        assert!(session.log.is_empty());

        let session = service.create(Some(UserRole::PolicyMaker)).await.unwrap();
        assert_eq!(session.role, UserRole::PolicyMaker);
    }

    #[tokio::test]
    async fn test_append_and_snapshot_order() {
        let service = service();
        let session = service.create(None).await.unwrap();

        service
            .append_message(&session.id, ChatMessage::user("first"))
            .await
            .unwrap();
        service
            .append_message(&session.id, ChatMessage::assistant("second"))
            .await
            .unwrap();

        let snapshot = service.snapshot(&session.id).await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].role, MessageRole::User);
        assert_eq!(snapshot[0].content, "first");
        assert_eq!(snapshot[1].role, MessageRole::Assistant);
        assert_eq!(snapshot[1].content, "second");
    }

    #[tokio::test]
    async fn test_list_rejects_zero_page() {
        let service = service();
        let query = SessionQuery {
            pagination: Pagination::new(0, 20),
        };
        let err = service.list(query).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_snapshot_missing_session() {
        let service = service();
        let err = service.snapshot("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_session() {
        let service = service();
        let err = service.delete("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
