// ==========================================
// 工包工时核算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读写逻辑，不含引擎逻辑
// ==========================================

pub mod reference;
pub mod result;
pub mod types;
pub mod workpack;

// 重导出核心类型
pub use reference::{AircraftTypeRecord, BonusRecord, CoefficientRecord};
pub use result::{
    AircraftIdentity, BonusContribution, CoefficientBreakdown, HighHourRow, ManHourTotals,
    NewIdentifier, ProcessedRow, ProcessingResult, RowCounts, RowIssue, SpecialCodeShare,
    ToolShortage,
};
pub use types::{CoefficientMode, IdRule, IssueKind, IssueLevel, SeqClass, ToolKind};
pub use workpack::{AircraftInfo, ColumnPresence, ToolFields, Workpack, WorkpackPeriod, WorkpackRow};
