// ==========================================
// 工包工时核算系统 - 核心库
// ==========================================
// 输入: 工包表格（xlsx / xls / csv）+ 参考数据
// 输出: 工时汇总、新任务号、工具航材短缺报表
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 工时计算
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - settings.toml
pub mod config;

// 报表层 - CSV / JSON / 调试日志
pub mod report;

// 应用层 - 命令行与运行编排
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{AppConfig, ConfigError, ConfigManager};
pub use domain::{CoefficientMode, ProcessingResult, Workpack, WorkpackRow};
pub use engine::{LookupTables, WorkpackProcessor};
pub use importer::{ReferenceLoader, WorkpackImporter};
pub use report::ReportWriter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工包工时核算系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
