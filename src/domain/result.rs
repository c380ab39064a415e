// ==========================================
// 工包工时核算系统 - 处理结果模型
// ==========================================
// 用途: 引擎层产出，报表层只读
// 生命周期: 每个输入文件新建一份，核心层不落盘
// ==========================================

use crate::domain::types::{CoefficientMode, IssueKind, IssueLevel, SeqClass, ToolKind};
use crate::domain::workpack::WorkpackPeriod;
use serde::{Deserialize, Serialize};

// ==========================================
// ProcessedRow - 计算后的任务行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRow {
    pub row_number: usize,
    pub seq_no: String,
    pub title: String,
    pub class: SeqClass,
    pub task_id: String,

    pub base_hours: f64,
    pub check_group: Option<String>,
    pub function_group: Option<String>,
    pub special_code: Option<String>,

    pub coefficient: Option<f64>, // None = 未命中（按 1.0 计）
    pub adjusted_hours: f64,
}

impl ProcessedRow {
    /// 系数带来的增量工时
    pub fn coefficient_delta(&self) -> f64 {
        self.adjusted_hours - self.base_hours
    }

    pub fn effective_coefficient(&self) -> f64 {
        self.coefficient.unwrap_or(1.0)
    }
}

// ==========================================
// ManHourTotals - 工时汇总
// ==========================================
// 红线: total = base + coefficient_delta + bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManHourTotals {
    pub base_hours: f64,
    pub coefficient_delta: f64,
    pub bonus_hours: f64,
    pub total_hours: f64,
}

impl ManHourTotals {
    pub fn new(base_hours: f64, coefficient_delta: f64, bonus_hours: f64) -> Self {
        Self {
            base_hours,
            coefficient_delta,
            bonus_hours,
            total_hours: base_hours + coefficient_delta + bonus_hours,
        }
    }

    /// 系数增量 + 奖励工时
    pub fn additional_hours(&self) -> f64 {
        self.coefficient_delta + self.bonus_hours
    }
}

/// 机号信息（取自首行）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftIdentity {
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub wp_type: Option<String>,
    pub check_group: Option<String>,
}

/// 新任务号（参考库中不存在）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIdentifier {
    pub seq_no: String,
    pub task_id: String,
    pub is_eo: bool,
}

/// 高工时任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighHourRow {
    pub row_number: usize,
    pub seq_no: String,
    pub title: String,
    pub task_id: String,
    pub base_hours: f64,
    pub adjusted_hours: f64,
}

/// 奖励工时来源（参考表 sheet 名 → 工时）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusContribution {
    pub source: String,
    pub hours: f64,
}

/// 类型系数分功能组明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientBreakdown {
    pub function_group: String,
    pub coefficient: f64,
    pub row_count: usize,
    pub base_hours: f64,
    pub adjusted_hours: f64,
    pub additional_hours: f64,
}

/// 特殊代码工时分布
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCodeShare {
    pub code: Option<String>,
    pub hours: f64,
    pub hours_per_day: Option<f64>,
    pub percentage: f64,
}

/// 工具 / 航材短缺
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolShortage {
    pub row_number: usize,
    pub seq_no: String,
    pub task_id: String,
    pub part_number: String,
    pub name: String,
    pub kind: ToolKind,
}

// ==========================================
// RowIssue - 行级问题（不中断处理）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    pub row_number: Option<usize>, // None = 文件级
    pub seq_no: Option<String>,
    pub kind: IssueKind,
    pub level: IssueLevel,
    pub message: String,
}

impl RowIssue {
    pub fn warning(row_number: Option<usize>, seq_no: Option<&str>, kind: IssueKind, message: String) -> Self {
        Self {
            row_number,
            seq_no: seq_no.map(str::to_string),
            kind,
            level: IssueLevel::Warning,
            message,
        }
    }

    pub fn info(row_number: Option<usize>, seq_no: Option<&str>, kind: IssueKind, message: String) -> Self {
        Self {
            row_number,
            seq_no: seq_no.map(str::to_string),
            kind,
            level: IssueLevel::Info,
            message,
        }
    }
}

/// 行数统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub total: usize,
    pub processed: usize,
    pub unique: usize,
    pub skipped: usize,
}

// ==========================================
// ProcessingResult - 单文件处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub source_name: String,
    pub identity: AircraftIdentity,
    pub period: Option<WorkpackPeriod>,
    pub mode: CoefficientMode,

    // ===== 工时 =====
    pub totals: ManHourTotals,
    pub average_per_day: Option<f64>, // 工包天数 < 1 时为 None
    pub coefficient_breakdown: Vec<CoefficientBreakdown>,
    pub bonus_breakdown: Vec<BonusContribution>,
    pub special_codes: Option<Vec<SpecialCodeShare>>,

    // ===== 清单 =====
    pub high_hours_threshold: f64,
    pub high_hour_rows: Vec<HighHourRow>,
    pub new_identifiers: Vec<NewIdentifier>,
    pub tool_shortages: Option<Vec<ToolShortage>>,

    // ===== 调试 =====
    pub row_counts: RowCounts,
    pub debug_sample: Vec<ProcessedRow>,
    pub issues: Vec<RowIssue>,
}
