// ==========================================
// 工包工时核算系统 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 配置错误一律致命，终止整个运行
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("未找到配置文件（已查找: {searched}）")]
    NotFound { searched: String },

    #[error("配置文件读取失败 ({path}): {message}")]
    Read { path: PathBuf, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    Parse { path: PathBuf, message: String },

    #[error("缺少配置段 [{section}]（{reason}）")]
    MissingSection { section: String, reason: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("{feature} 已启用，但参考文件不存在: {path}")]
    ReferenceNotFound { feature: String, path: PathBuf },

    #[error("参考文件读取失败 ({feature}): {message}")]
    ReferenceUnreadable { feature: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
