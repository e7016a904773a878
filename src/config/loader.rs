use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级从低到高：
    /// 1. 开发环境默认值
    /// 2. ./config.toml
    /// 3. FLOATCHAT_ 前缀的环境变量（层级用 `__` 分隔）
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::figment(default_config_path()).extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("FLOATCHAT_").split("__").global())
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.chat.max_query_length == 0 {
            return Err(ConfigValidationError::InvalidQueryLimit);
        }

        if let Some(path) = &config.dataset.source_path {
            if !path.exists() {
                return Err(ConfigValidationError::InvalidPath(
                    path.display().to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("查询长度上限无效，必须大于 0")]
    InvalidQueryLimit,

    #[error("数据集路径不存在: {0}")]
    InvalidPath(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
