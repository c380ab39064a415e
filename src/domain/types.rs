// ==========================================
// 工包工时核算系统 - 领域类型定义
// ==========================================
// 职责: 配置加载时确定的有限枚举（SEQ 分类 / 任务号提取规则 / 系数模式）
// 红线: 热路径内不做字符串分派，全部在配置加载时转换为枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// SEQ 分类 (Seq Class)
// ==========================================
// 配置值: "true" → 核对参考库, "false" → 仅计算, "ignore" → 跳过
// 未配置的 SEQ 大类一律视为 Skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeqClass {
    CheckAgainstReference, // 计算工时 + 核对新任务号
    ProcessOnly,           // 仅计算工时
    Skip,                  // 完全跳过
}

impl SeqClass {
    /// 解析配置值（大小写不敏感）
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Some(SeqClass::CheckAgainstReference),
            "false" => Some(SeqClass::ProcessOnly),
            "ignore" => Some(SeqClass::Skip),
            _ => None,
        }
    }

    /// 是否参与工时计算
    pub fn is_processed(self) -> bool {
        !matches!(self, SeqClass::Skip)
    }

    /// 是否需要核对参考库
    pub fn should_check(self) -> bool {
        matches!(self, SeqClass::CheckAgainstReference)
    }
}

impl fmt::Display for SeqClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqClass::CheckAgainstReference => write!(f, "CHECK_AGAINST_REFERENCE"),
            SeqClass::ProcessOnly => write!(f, "PROCESS_ONLY"),
            SeqClass::Skip => write!(f, "SKIP"),
        }
    }
}

// ==========================================
// 任务号提取规则 (Id Rule)
// ==========================================
// 配置值: "-" → 取 "(" 之前, "/" → 取 "/" 之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdRule {
    BeforeParen,
    BeforeSlash,
}

impl IdRule {
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim() {
            "-" => Some(IdRule::BeforeParen),
            "/" => Some(IdRule::BeforeSlash),
            _ => None,
        }
    }

    /// 规则对应的分隔符
    pub fn delimiter(self) -> char {
        match self {
            IdRule::BeforeParen => '(',
            IdRule::BeforeSlash => '/',
        }
    }
}

impl fmt::Display for IdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRule::BeforeParen => write!(f, "BEFORE_PAREN"),
            IdRule::BeforeSlash => write!(f, "BEFORE_SLASH"),
        }
    }
}

// ==========================================
// 类型系数汇总模式 (Coefficient Mode)
// ==========================================
// 全系统影响最大的单一开关：改变最终总工时
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoefficientMode {
    PerUniqueKey, // 每个 SEQ 只计一次（首次出现）
    PerRow,       // 每一物理行都计入
}

impl CoefficientMode {
    pub fn from_per_seq_flag(per_seq: bool) -> Self {
        if per_seq {
            CoefficientMode::PerUniqueKey
        } else {
            CoefficientMode::PerRow
        }
    }
}

impl fmt::Display for CoefficientMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientMode::PerUniqueKey => write!(f, "PER_UNIQUE_KEY"),
            CoefficientMode::PerRow => write!(f, "PER_ROW"),
        }
    }
}

// ==========================================
// 行级问题 (Row Issue)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueLevel {
    Warning, // 警告（已按默认值继续）
    Info,    // 提示（仅记录）
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    MalformedDuration,     // 计划工时非数值 → 0
    MissingDuration,       // 计划工时为空 → 0
    UnresolvedCheckGroup,  // 工包类型首字母未配置
    UnresolvedAircraftType, // 注册号未找到机型
    CoefficientMiss,       // 系数未命中 → 1.0
    BonusMiss,             // 奖励工时未命中 → 0
    UnmappedSeqPrefix,     // SEQ 大类未配置 → 跳过
    InvalidWorkpackPeriod, // 工包起止日期无法解析
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::MalformedDuration => "MALFORMED_DURATION",
            IssueKind::MissingDuration => "MISSING_DURATION",
            IssueKind::UnresolvedCheckGroup => "UNRESOLVED_CHECK_GROUP",
            IssueKind::UnresolvedAircraftType => "UNRESOLVED_AIRCRAFT_TYPE",
            IssueKind::CoefficientMiss => "COEFFICIENT_MISS",
            IssueKind::BonusMiss => "BONUS_MISS",
            IssueKind::UnmappedSeqPrefix => "UNMAPPED_SEQ_PREFIX",
            IssueKind::InvalidWorkpackPeriod => "INVALID_WORKPACK_PERIOD",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 工具 / 航材类别 (Tool Kind)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Tool,
    Spare,
    Unknown,
    Other(String), // 源数据中的非 Y/N 值，原样保留
}

impl ToolKind {
    /// 'Y' → Tool, 'N' → Spare, 空 → Unknown
    pub fn from_flag(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => ToolKind::Unknown,
            Some(v) if v.eq_ignore_ascii_case("Y") => ToolKind::Tool,
            Some(v) if v.eq_ignore_ascii_case("N") => ToolKind::Spare,
            Some(v) => ToolKind::Other(v.to_string()),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Tool => write!(f, "Tool"),
            ToolKind::Spare => write!(f, "Spare"),
            ToolKind::Unknown => write!(f, "Unknown"),
            ToolKind::Other(v) => write!(f, "{}", v),
        }
    }
}
