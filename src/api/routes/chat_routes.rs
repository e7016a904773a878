//! Chat Routes
//!
//! 定义会话内对话相关的 API 路由。

use crate::api::handlers::chat_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建对话路由器
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/:id/chat/query", post(submit_query))
        .route("/sessions/:id/chat/quick", post(submit_quick_query))
}
