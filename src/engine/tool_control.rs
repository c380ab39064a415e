// ==========================================
// 工包工时核算系统 - 工具 / 航材控制
// ==========================================
// 职责: 找出总数量与替代件数量均为 0 的工具 / 航材
// 红线:
//   - 逐行检查，不去重（同 SEQ 多行代表不同件号需求）
//   - 不受 SEQ 分类影响，文件中每一行都检查
//   - 忽略清单大小写不敏感，同时匹配件号与名称
// ==========================================

use crate::domain::result::ToolShortage;
use crate::domain::types::ToolKind;
use crate::domain::workpack::{ToolFields, WorkpackRow};
use crate::engine::id_extractor::{self, SeqRules};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// IgnoreList - 忽略清单
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IgnoreList {
    items: HashSet<String>, // 小写
}

impl IgnoreList {
    /// 解析忽略清单文本（# 开头为注释，空行跳过）
    pub fn parse(content: &str) -> Self {
        let items = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { items }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.contains(&value.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 数量解析：非数值按 0
fn quantity(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

// ==========================================
// ToolControlChecker
// ==========================================
pub struct ToolControlChecker<'a> {
    seq_rules: &'a SeqRules,
    ignore_list: &'a IgnoreList,
}

impl<'a> ToolControlChecker<'a> {
    pub fn new(seq_rules: &'a SeqRules, ignore_list: &'a IgnoreList) -> Self {
        Self {
            seq_rules,
            ignore_list,
        }
    }

    pub fn check(&self, rows: &[WorkpackRow]) -> Vec<ToolShortage> {
        let mut shortages = Vec::new();
        let mut ignored = 0usize;

        for row in rows {
            let Some(tool) = row.tool.as_ref() else {
                continue;
            };
            let Some((name, part_number)) = Self::zero_quantity_item(tool) else {
                continue;
            };

            if self.ignore_list.contains(part_number) || self.ignore_list.contains(name) {
                ignored += 1;
                debug!(row_number = row.row_number, part_number = %part_number, name = %name, "忽略清单命中");
                continue;
            }

            let rule = self.seq_rules.rule_for(&row.seq_no);
            shortages.push(ToolShortage {
                row_number: row.row_number,
                seq_no: row.seq_no.clone(),
                task_id: id_extractor::extract(&row.title, rule),
                part_number: part_number.to_string(),
                name: name.to_string(),
                kind: ToolKind::from_flag(tool.tool_type.as_deref()),
            });
        }

        debug!(shortages = shortages.len(), ignored, "工具控制检查完成");
        shortages
    }

    /// 两个数量均为 0，且名称与件号均非空
    fn zero_quantity_item(tool: &ToolFields) -> Option<(&str, &str)> {
        if quantity(tool.total_qty.as_deref()) != 0.0 || quantity(tool.alt_qty.as_deref()) != 0.0 {
            return None;
        }
        let name = non_empty(tool.name.as_deref())?;
        let part_number = non_empty(tool.part_no.as_deref())?;
        Some((name, part_number))
    }
}

// ==========================================
// ToolControlSummary - 汇总统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolControlSummary {
    pub total_issues: usize,
    pub tools: usize,
    pub spares: usize,
    pub unique_parts: usize,
    pub affected_seqs: usize,
}

pub fn summarize(shortages: &[ToolShortage]) -> ToolControlSummary {
    let unique_parts: HashSet<&str> = shortages.iter().map(|s| s.part_number.as_str()).collect();
    let affected_seqs: HashSet<&str> = shortages.iter().map(|s| s.seq_no.as_str()).collect();

    ToolControlSummary {
        total_issues: shortages.len(),
        tools: shortages.iter().filter(|s| s.kind == ToolKind::Tool).count(),
        spares: shortages.iter().filter(|s| s.kind == ToolKind::Spare).count(),
        unique_parts: unique_parts.len(),
        affected_seqs: affected_seqs.len(),
    }
}
