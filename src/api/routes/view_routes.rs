//! View Routes
//!
//! 定义仪表盘视图相关的 API 路由。

use crate::api::handlers::view_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建视图路由器
pub fn create_view_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/:id/views/chatbot", get(chatbot_view))
        .route("/sessions/:id/views/explore", get(explore_view))
        .route("/sessions/:id/views/visualizations", get(visualizations_view))
        .route("/sessions/:id/views/history", get(history_view))
}
