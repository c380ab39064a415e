// ==========================================
// 工包工时核算系统 - 报表模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 报表写入失败属于文件级错误，不终止整个运行
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("输出目录创建失败 ({path}): {message}")]
    CreateDir { path: PathBuf, message: String },

    #[error("CSV 写入失败 ({path}): {message}")]
    Csv { path: PathBuf, message: String },

    #[error("JSON 序列化失败 ({path}): {message}")]
    Json { path: PathBuf, message: String },

    #[error("调试日志写入失败 ({path}): {message}")]
    DebugLog { path: PathBuf, message: String },
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
