//! 错误处理模块
//!
//! 定义应用程序的错误类型、HTTP 状态码映射和统一错误响应格式。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::observation::FloatObservation;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求了数据集中不存在的列
    #[error("数据列不存在: {0}")]
    InvalidField(String),

    /// 提交的查询去除空白后为空
    #[error("查询内容不能为空")]
    EmptyQuery,

    /// 日期区间无效
    #[error("日期区间无效: 结束日期 {end} 早于开始日期 {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// 会话或资源不存在
    #[error("资源不存在: {0}")]
    NotFound(String),

    /// 请求参数未通过校验
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 配置加载或校验失败
    #[error("配置错误: {0}")]
    Config(String),

    /// JSON 编解码失败
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// CSV 编解码失败
    #[error("CSV 编解码错误: {0}")]
    Csv(String),

    /// 服务内部错误
    #[error("内部错误: {0}")]
    Internal(String),

    /// 文件读写失败
    #[error("IO 错误: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        let mut body = ErrorResponse::new(&code, &self.to_string());
        // 列名错误时附上可用列，省得调用方去翻文档
        if matches!(self, AppError::InvalidField(_)) {
            body = body.with_details(&format!(
                "可用列: {}",
                FloatObservation::COLUMNS.join(", ")
            ));
        }
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
    /// 请求 ID
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::NotFound(_) => (404, "NOT_FOUND".to_string()),
            AppError::InvalidField(_) => (400, "INVALID_FIELD".to_string()),
            AppError::EmptyQuery => (400, "EMPTY_QUERY".to_string()),
            AppError::InvalidDateRange { .. } => (400, "INVALID_DATE_RANGE".to_string()),
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Config(_) => (500, "CONFIG_ERROR".to_string()),
            AppError::Csv(_) => (500, "CSV_ERROR".to_string()),
            _ => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
