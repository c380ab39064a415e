// ==========================================
// 工包工时核算系统 - 应用层
// ==========================================
// 职责: 命令行定义 + 运行编排（文件发现 / 单文件错误隔离 / 运行汇总）
// ==========================================

pub mod cli;
pub mod runner;

pub use cli::{Cli, Command, GlobalArgs};
pub use runner::{
    discover_input_files, FileOutcome, FileProcessingError, FileStatus, RunError, RunSummary,
    Runner,
};
