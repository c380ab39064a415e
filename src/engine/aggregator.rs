// ==========================================
// 工包工时核算系统 - 去重与汇总
// ==========================================
// 职责:
//   - 按 SEQ 去重（首次出现保留，保持首次出现顺序）
//   - base / coefficient_delta / bonus / total 汇总
//   - 高工时任务筛选
// 红线:
//   - 去重结果顺序来自插入顺序，不依赖无序集合
//   - 奖励工时每个文件只加一次，从不逐行累加
//   - 工具控制类逐行检查不使用去重结果
// ==========================================

use crate::domain::result::{HighHourRow, ManHourTotals, ProcessedRow};
use crate::domain::types::CoefficientMode;
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// FirstOccurrenceMap - 插入有序的首次出现映射
// ==========================================
#[derive(Debug)]
pub struct FirstOccurrenceMap<'a, T> {
    positions: HashMap<&'a str, usize>,
    entries: Vec<&'a T>,
}

impl<'a, T> FirstOccurrenceMap<'a, T> {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// 键首次出现时插入并返回 true；重复键忽略
    pub fn insert_first(&mut self, key: &'a str, item: &'a T) -> bool {
        if self.positions.contains_key(key) {
            return false;
        }
        self.positions.insert(key, self.entries.len());
        self.entries.push(item);
        true
    }

    pub fn get(&self, key: &str) -> Option<&'a T> {
        self.positions.get(key).map(|&idx| self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_values(self) -> Vec<&'a T> {
        self.entries
    }
}

impl<'a, T> Default for FirstOccurrenceMap<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 按 SEQ 去重，保留首次出现
pub fn dedupe(rows: &[ProcessedRow]) -> Vec<&ProcessedRow> {
    let mut map = FirstOccurrenceMap::new();
    for row in rows {
        map.insert_first(row.seq_no.as_str(), row);
    }
    map.into_values()
}

// ==========================================
// Aggregator
// ==========================================
pub struct Aggregator {
    mode: CoefficientMode,
    high_hours_threshold: f64,
}

impl Aggregator {
    pub fn new(mode: CoefficientMode, high_hours_threshold: f64) -> Self {
        Self {
            mode,
            high_hours_threshold,
        }
    }

    /// 系数增量所依据的行集合
    ///
    /// - PerUniqueKey: 去重后的行
    /// - PerRow: 全部参与计算的行
    pub fn coefficient_rows<'r>(
        &self,
        rows: &'r [ProcessedRow],
        unique: &[&'r ProcessedRow],
    ) -> Vec<&'r ProcessedRow> {
        match self.mode {
            CoefficientMode::PerUniqueKey => unique.to_vec(),
            CoefficientMode::PerRow => rows.iter().collect(),
        }
    }

    /// 汇总工时
    ///
    /// # 参数
    /// - rows: 全部参与计算的行（未去重）
    /// - unique: 去重后的行
    /// - bonus_hours: 文件级奖励工时（已在调用处落地默认值 0.0）
    pub fn totals(&self, rows: &[ProcessedRow], unique: &[&ProcessedRow], bonus_hours: f64) -> ManHourTotals {
        let base_hours: f64 = unique.iter().map(|r| r.base_hours).sum();
        let coefficient_delta: f64 = self
            .coefficient_rows(rows, unique)
            .iter()
            .map(|r| r.coefficient_delta())
            .sum();

        ManHourTotals::new(base_hours, coefficient_delta, bonus_hours)
    }

    /// 调整后工时超过阈值的去重行，按调整后工时降序；相同工时按原始行序
    pub fn high_hour_rows(&self, unique: &[&ProcessedRow]) -> Vec<HighHourRow> {
        let mut selected: Vec<&ProcessedRow> = unique
            .iter()
            .copied()
            .filter(|r| r.adjusted_hours > self.high_hours_threshold)
            .collect();

        selected.sort_by(|a, b| {
            b.adjusted_hours
                .partial_cmp(&a.adjusted_hours)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.row_number.cmp(&b.row_number))
        });

        selected
            .into_iter()
            .map(|r| HighHourRow {
                row_number: r.row_number,
                seq_no: r.seq_no.clone(),
                title: r.title.clone(),
                task_id: r.task_id.clone(),
                base_hours: r.base_hours,
                adjusted_hours: r.adjusted_hours,
            })
            .collect()
    }
}

/// 日均工时；工包天数 < 1 或未知时为 None
pub fn average_per_day(total_hours: f64, workpack_days: Option<i64>) -> Option<f64> {
    match workpack_days {
        Some(days) if days >= 1 => Some(total_hours / days as f64),
        _ => None,
    }
}
