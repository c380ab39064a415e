// ==========================================
// 工包工时核算系统 - 报表层
// ==========================================
// 职责: ProcessingResult → CSV 报表 / summary.json / 调试日志
// 红线: 只读结果，不做任何计算
// ==========================================

pub mod debug_log;
pub mod error;
pub mod format;
pub mod sheets;
pub mod writer;

pub use error::{ReportError, ReportResult};
pub use format::hours_to_hhmm;
pub use sheets::Sheet;
pub use writer::{ReportOutput, ReportWriter, SUMMARY_FILE_NAME};
