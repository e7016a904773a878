//! Dataset Routes
//!
//! 定义样本数据集相关的 API 路由。

use crate::api::handlers::dataset_handler::*;
use axum::{Router, routing::get};

use crate::api::app_state::AppState;

/// 创建数据集路由器
pub fn create_dataset_router() -> Router<AppState> {
    Router::new()
        .route("/dataset", get(get_dataset))
        .route("/dataset/filtered", get(get_filtered))
        .route("/dataset/columns", get(get_columns))
        .route("/dataset/export", get(export_csv))
}
