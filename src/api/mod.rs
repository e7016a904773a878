//! API 模块
//!
//! 聚合会话、对话、视图和数据集四组路由，挂载在 `/api/v1` 下。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::app_state::AppState;
use crate::error::AppError;

/// 组装完整的 API 路由树
pub fn create_router(app_state: AppState) -> Router {
    let api = routes::session_routes::create_session_router()
        .merge(routes::chat_routes::create_chat_router())
        .merge(routes::view_routes::create_view_router())
        .merge(routes::dataset_routes::create_dataset_router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn initialize_api(app_state: AppState) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(create_router(app_state))
}
