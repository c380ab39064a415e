// ==========================================
// 工包工时核算系统 - 特殊代码工时分布
// ==========================================
// 规则:
//   - 基于去重后的行，按调整后工时累加
//   - 空代码归入 None（报表显示为 "(No Code)"）
//   - 按工时降序，工时相同按首次出现顺序
//   - 百分比基于文件总工时；总工时 ≤ 0 时为 0
// ==========================================

use crate::domain::result::{ProcessedRow, SpecialCodeShare};
use std::cmp::Ordering;

pub fn distribution<'r, I>(
    unique_rows: I,
    total_hours: f64,
    workpack_days: Option<i64>,
) -> Vec<SpecialCodeShare>
where
    I: IntoIterator<Item = &'r ProcessedRow>,
{
    let mut buckets: Vec<(Option<String>, f64)> = Vec::new();

    for row in unique_rows {
        let code = row
            .special_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        match buckets.iter_mut().find(|(c, _)| *c == code) {
            Some((_, hours)) => *hours += row.adjusted_hours,
            None => buckets.push((code, row.adjusted_hours)),
        }
    }

    // sort_by 为稳定排序，相同工时保持首次出现顺序
    buckets.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let days = workpack_days.filter(|d| *d >= 1);
    buckets
        .into_iter()
        .map(|(code, hours)| SpecialCodeShare {
            code,
            hours,
            hours_per_day: days.map(|d| hours / d as f64),
            percentage: if total_hours > 0.0 {
                hours / total_hours * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// 特殊代码列是否有任何非空值
pub fn has_data<'r, I>(rows: I) -> bool
where
    I: IntoIterator<Item = &'r ProcessedRow>,
{
    rows.into_iter().any(|r| {
        r.special_code
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    })
}
