// ==========================================
// 工包工时核算系统 - 引擎层
// ==========================================
// 职责: 工时计算核心（查找表 / 任务号提取 / 规范化 / 系数 / 去重汇总 / 参考库核对）
// 红线: 引擎不读写文件；查找表构建完成后只读
// ==========================================

pub mod aggregator;
pub mod coefficient;
pub mod id_extractor;
pub mod lookup;
pub mod normalizer;
pub mod processor;
pub mod reference_checker;
pub mod special_code;
pub mod tool_control;

// 重导出核心引擎
pub use aggregator::{average_per_day, dedupe, Aggregator, FirstOccurrenceMap};
pub use coefficient::{AdjustedHours, CoefficientApplier, CoefficientKey};
pub use id_extractor::{extract, SeqDecision, SeqRules};
pub use lookup::{
    AircraftTypeIndex, BonusEntry, BonusTable, CoefficientTable, LookupTables, ReferenceIds,
};
pub use normalizer::{to_hours, CheckGroupMap, MinutesValue, NormalizedRow, RowNormalizer};
pub use processor::WorkpackProcessor;
pub use reference_checker::ReferenceChecker;
pub use tool_control::{IgnoreList, ToolControlChecker, ToolControlSummary};
