use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{AppError, Result};
use crate::models::session::Session;

/// 会话仓储 trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 创建会话
    async fn create(&self, session: &Session) -> Result<Session>;

    /// 根据 ID 获取会话
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// 在条目锁内原子地修改会话
    ///
    /// 闭包在持有该会话条目写锁的情况下执行，同一会话的并发修改
    /// 互相串行，不会互相覆盖。返回修改后的会话。
    async fn update_with(
        &self,
        id: &str,
        mutate: Box<dyn for<'a> FnOnce(&'a mut Session) + Send>,
    ) -> Result<Option<Session>>;

    /// 删除会话
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 按创建时间倒序列出会话
    async fn list(&self, limit: usize, start: usize) -> Result<Vec<Session>>;

    /// 统计会话数量
    async fn count(&self) -> Result<u64>;
}

/// 内存会话仓储
///
/// 进程内唯一的会话状态来源，不做任何持久化。
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        if self.sessions.contains_key(&session.id) {
            return Err(AppError::Validation(format!(
                "Session already exists: {}",
                session.id
            )));
        }
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(session.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn update_with(
        &self,
        id: &str,
        mutate: Box<dyn for<'a> FnOnce(&'a mut Session) + Send>,
    ) -> Result<Option<Session>> {
        // get_mut 持有分片写锁直到 entry 释放，闭包内不得 await
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                mutate(entry.value_mut());
                Ok(Some(entry.value().clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.remove(id).is_some())
    }

    async fn list(&self, limit: usize, start: usize) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions.into_iter().skip(start).take(limit).collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.sessions.len() as u64)
    }
}
