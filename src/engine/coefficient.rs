// ==========================================
// 工包工时核算系统 - 类型系数应用
// ==========================================
// 公式: adjusted = base × coefficient
// 未命中: adjusted == base（系数视为 1.0，不做任何缩放）
// ==========================================

use crate::domain::result::{CoefficientBreakdown, ProcessedRow};
use crate::engine::lookup::CoefficientTable;

/// 系数查找键（任一分量缺失即视为未命中）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoefficientKey<'a> {
    pub check_group: Option<&'a str>,
    pub aircraft_code: Option<&'a str>,
    pub function_group: Option<&'a str>,
}

impl<'a> CoefficientKey<'a> {
    fn parts(&self) -> Option<(&'a str, &'a str, &'a str)> {
        Some((self.check_group?, self.aircraft_code?, self.function_group?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedHours {
    pub coefficient: Option<f64>,
    pub hours: f64,
}

/// 纯函数：查表并调整工时
pub fn apply(base_hours: f64, key: &CoefficientKey<'_>, table: &CoefficientTable) -> AdjustedHours {
    let coefficient = key
        .parts()
        .and_then(|(check_group, aircraft_code, function_group)| {
            table.get(check_group, aircraft_code, function_group)
        });

    match coefficient {
        Some(c) => AdjustedHours {
            coefficient: Some(c),
            hours: base_hours * c,
        },
        None => AdjustedHours {
            coefficient: None,
            hours: base_hours,
        },
    }
}

// ==========================================
// CoefficientApplier
// ==========================================
// table 为 None 表示功能关闭：直接返回原值，不查询
pub struct CoefficientApplier<'a> {
    table: Option<&'a CoefficientTable>,
}

impl<'a> CoefficientApplier<'a> {
    pub fn new(table: Option<&'a CoefficientTable>) -> Self {
        Self { table }
    }

    pub fn is_enabled(&self) -> bool {
        self.table.is_some()
    }

    pub fn apply(&self, base_hours: f64, key: &CoefficientKey<'_>) -> AdjustedHours {
        match self.table {
            Some(table) => apply(base_hours, key, table),
            None => AdjustedHours {
                coefficient: None,
                hours: base_hours,
            },
        }
    }
}

/// 按功能组汇总系数增量（增量绝对值 ≤ 0.01h 的组不列出）
pub fn breakdown<'r, I>(rows: I) -> Vec<CoefficientBreakdown>
where
    I: IntoIterator<Item = &'r ProcessedRow>,
{
    let mut groups: Vec<CoefficientBreakdown> = Vec::new();

    for row in rows {
        let Some(function_group) = row.function_group.as_deref() else {
            continue;
        };

        match groups.iter_mut().find(|g| g.function_group == function_group) {
            Some(group) => {
                group.row_count += 1;
                group.base_hours += row.base_hours;
                group.adjusted_hours += row.adjusted_hours;
            }
            None => groups.push(CoefficientBreakdown {
                function_group: function_group.to_string(),
                coefficient: row.effective_coefficient(),
                row_count: 1,
                base_hours: row.base_hours,
                adjusted_hours: row.adjusted_hours,
                additional_hours: 0.0,
            }),
        }
    }

    groups
        .into_iter()
        .map(|mut g| {
            g.additional_hours = g.adjusted_hours - g.base_hours;
            g
        })
        .filter(|g| g.additional_hours.abs() > 0.01)
        .collect()
}
