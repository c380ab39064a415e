// ==========================================
// 工包工时核算系统 - 行规范化
// ==========================================
// 职责: 计划工时（分钟）→ 小时；解析检查组 / 功能组
// 红线: 单行坏数据不中断处理，按 0 / 未解析继续并记录问题
// ==========================================

use crate::domain::result::RowIssue;
use crate::domain::types::IssueKind;
use crate::domain::workpack::{AircraftInfo, WorkpackRow};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// 计划工时解析
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum MinutesValue {
    Parsed(f64),
    Missing,
    Malformed(String),
}

impl MinutesValue {
    pub fn parse(raw: Option<&str>) -> Self {
        let value = match raw.map(str::trim) {
            None | Some("") => return MinutesValue::Missing,
            Some(v) => v,
        };

        match value.parse::<f64>() {
            Ok(minutes) if minutes.is_finite() => MinutesValue::Parsed(minutes),
            _ => MinutesValue::Malformed(value.to_string()),
        }
    }

    /// 分钟 → 小时；缺失或非数值按 0
    pub fn hours(&self) -> f64 {
        match self {
            MinutesValue::Parsed(minutes) => minutes / 60.0,
            MinutesValue::Missing | MinutesValue::Malformed(_) => 0.0,
        }
    }
}

/// 分钟 → 小时（非数值 / 缺失 → 0.0）
pub fn to_hours(raw: Option<&str>) -> f64 {
    MinutesValue::parse(raw).hours()
}

// ==========================================
// CheckGroupMap - 工包类型首字母 → 检查组
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckGroupMap {
    groups: HashMap<char, String>,
}

impl CheckGroupMap {
    pub fn new(groups: HashMap<char, String>) -> Self {
        Self {
            groups: groups
                .into_iter()
                .map(|(letter, group)| (letter.to_ascii_uppercase(), group.trim().to_string()))
                .collect(),
        }
    }

    /// "A06" → "A-CHECK"；首字母未配置返回 None
    pub fn resolve(&self, wp_type: &str) -> Option<&str> {
        let first = wp_type.trim().chars().next()?.to_ascii_uppercase();
        self.groups.get(&first).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ==========================================
// NormalizedRow - 规范化结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub base_hours: f64,
    pub wp_type: Option<String>,
    pub check_group: Option<String>,
    pub function_group: Option<String>,
}

// ==========================================
// RowNormalizer - 无状态逐行转换
// ==========================================
pub struct RowNormalizer<'a> {
    check_groups: &'a CheckGroupMap,
    fallback_wp_type: Option<&'a str>, // 行内复合字段为空时使用文件级工包类型
}

impl<'a> RowNormalizer<'a> {
    pub fn new(check_groups: &'a CheckGroupMap, fallback_wp_type: Option<&'a str>) -> Self {
        Self {
            check_groups,
            fallback_wp_type,
        }
    }

    pub fn normalize(&self, row: &WorkpackRow, issues: &mut Vec<RowIssue>) -> NormalizedRow {
        let base_hours = self.to_hours(row, issues);
        let (wp_type, check_group) = self.resolve_check_group(row, issues);

        NormalizedRow {
            base_hours,
            wp_type,
            check_group,
            function_group: row
                .function_group
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        }
    }

    fn to_hours(&self, row: &WorkpackRow, issues: &mut Vec<RowIssue>) -> f64 {
        let value = MinutesValue::parse(row.planned_minutes.as_deref());
        match &value {
            MinutesValue::Parsed(_) => {}
            MinutesValue::Missing => {
                debug!(row_number = row.row_number, seq_no = %row.seq_no, "计划工时为空，按 0 计");
                issues.push(RowIssue::info(
                    Some(row.row_number),
                    Some(&row.seq_no),
                    IssueKind::MissingDuration,
                    "计划工时为空，按 0 计".to_string(),
                ));
            }
            MinutesValue::Malformed(raw) => {
                debug!(row_number = row.row_number, seq_no = %row.seq_no, raw = %raw, "计划工时非数值，按 0 计");
                issues.push(RowIssue::warning(
                    Some(row.row_number),
                    Some(&row.seq_no),
                    IssueKind::MalformedDuration,
                    format!("计划工时非数值: '{}'，按 0 计", raw),
                ));
            }
        }
        value.hours()
    }

    fn resolve_check_group(
        &self,
        row: &WorkpackRow,
        issues: &mut Vec<RowIssue>,
    ) -> (Option<String>, Option<String>) {
        let wp_type = row
            .aircraft_info
            .as_deref()
            .and_then(AircraftInfo::parse)
            .map(|info| info.wp_type)
            .or_else(|| self.fallback_wp_type.map(str::to_string));

        let Some(wp_type) = wp_type else {
            issues.push(RowIssue::warning(
                Some(row.row_number),
                Some(&row.seq_no),
                IssueKind::UnresolvedCheckGroup,
                "缺少工包类型，无法确定检查组".to_string(),
            ));
            return (None, None);
        };

        match self.check_groups.resolve(&wp_type) {
            Some(group) => {
                let group = group.to_string();
                (Some(wp_type), Some(group))
            }
            None => {
                debug!(row_number = row.row_number, wp_type = %wp_type, "工包类型首字母未配置检查组");
                issues.push(RowIssue::warning(
                    Some(row.row_number),
                    Some(&row.seq_no),
                    IssueKind::UnresolvedCheckGroup,
                    format!("工包类型 '{}' 首字母未配置检查组", wp_type),
                ));
                (Some(wp_type), None)
            }
        }
    }
}
