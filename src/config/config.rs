use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout: 30,
            max_request_size: 2 * 1024 * 1024,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录，为空则只输出到控制台
    pub log_dir: Option<PathBuf>,
    /// 日志文件大小上限（字节）
    pub file_max_size: u64,
    /// 保留日志文件数
    pub file_max_count: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".into(),
            structured: false,
            log_dir: None,
            file_max_size: 100 * 1024 * 1024,
            file_max_count: 10,
        }
    }
}

/// 数据集配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasetConfig {
    /// 自定义 CSV 数据集路径，为空则使用内置样例数据
    pub source_path: Option<PathBuf>,
}

/// 聊天配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 自由文本查询的最大字符数
    pub max_query_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_query_length: 1000,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 数据集配置
    pub dataset: DatasetConfig,
    /// 聊天配置
    pub chat: ChatConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            dataset: DatasetConfig::default(),
            chat: ChatConfig::default(),
            app_name: "floatchat".into(),
            environment: "development".into(),
        }
    }
}

impl AppConfig {
    /// 开发环境配置
    pub fn development() -> Self {
        Self::default()
    }

    /// 生产环境配置
    ///
    /// 在开发配置基础上收紧日志：info 级别、JSON 格式、写入文件。
    pub fn production() -> Self {
        let mut config = Self::default();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config.logging.log_dir = Some(PathBuf::from("./logs"));
        config
    }
}
