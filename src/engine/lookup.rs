// ==========================================
// 工包工时核算系统 - 查找表
// ==========================================
// 职责: 注册号→机型 / (检查组, 机型, 功能组)→系数 / (工包类型, 机型)→奖励工时
// 红线: 构建一次后只读；只做精确键匹配；get 返回 Option，默认值在调用处落地
// ==========================================

use crate::domain::reference::{AircraftTypeRecord, BonusRecord, CoefficientRecord};
use crate::domain::result::BonusContribution;
use crate::engine::tool_control::IgnoreList;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

// ==========================================
// AircraftTypeIndex - 注册号 → 机型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AircraftTypeIndex {
    by_registration: HashMap<String, String>,
}

impl AircraftTypeIndex {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AircraftTypeRecord>,
    {
        let mut by_registration = HashMap::new();
        for record in records {
            let registration = record.registration.trim();
            let aircraft_type = record.aircraft_type.trim();
            if registration.is_empty() || aircraft_type.is_empty() {
                continue;
            }
            by_registration.insert(registration.to_string(), aircraft_type.to_string());
        }

        info!(entries = by_registration.len(), "机型索引构建完成");
        Self { by_registration }
    }

    /// 未收录的注册号返回 None（不是错误）
    pub fn get(&self, registration: &str) -> Option<&str> {
        self.by_registration
            .get(registration.trim())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_registration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_registration.is_empty()
    }
}

// ==========================================
// CoefficientTable - 类型系数表
// ==========================================
// 键: check_group → aircraft_code → function_group
// 规则: 仅 is_active 且系数 > 0 的行参与；同键多条时后出现的生效
type FunctionCoefficients = HashMap<String, f64>;

#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: HashMap<String, HashMap<String, FunctionCoefficients>>,
}

impl CoefficientTable {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CoefficientRecord>,
    {
        let mut entries: HashMap<String, HashMap<String, FunctionCoefficients>> = HashMap::new();
        let mut inactive = 0usize;
        let mut rejected = 0usize;

        for record in records {
            if !record.is_active {
                inactive += 1;
                continue;
            }
            if !is_valid_coefficient(record.coefficient) {
                warn!(
                    check_group = %record.check_group,
                    aircraft_code = %record.aircraft_code,
                    function_group = %record.function_group,
                    coefficient = record.coefficient,
                    "类型系数必须为正数，跳过"
                );
                rejected += 1;
                continue;
            }

            let check_group = record.check_group.trim();
            let aircraft_code = record.aircraft_code.trim();
            let function_group = record.function_group.trim();
            let previous = entries
                .entry(check_group.to_string())
                .or_default()
                .entry(aircraft_code.to_string())
                .or_default()
                .insert(function_group.to_string(), record.coefficient);
            if let Some(previous) = previous {
                debug!(
                    check_group = %check_group,
                    aircraft_code = %aircraft_code,
                    function_group = %function_group,
                    previous,
                    current = record.coefficient,
                    "类型系数重复键，后出现的生效"
                );
            }
        }

        let table = Self { entries };
        info!(entries = table.len(), inactive, rejected, "类型系数表构建完成");
        table
    }

    pub fn get(&self, check_group: &str, aircraft_code: &str, function_group: &str) -> Option<f64> {
        self.entries
            .get(check_group.trim())?
            .get(aircraft_code.trim())?
            .get(function_group.trim())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 系数须为有限正数
pub fn is_valid_coefficient(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ==========================================
// BonusTable - 奖励工时表
// ==========================================
// 键: (wp_type, aircraft_type)
// 规则: 命中的全部有效行累加（跨 sheet 累加），按 sheet 保留来源明细
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BonusEntry {
    pub total_hours: f64,
    pub sources: Vec<BonusContribution>,
}

impl BonusEntry {
    fn add(&mut self, source: &str, hours: f64) {
        self.total_hours += hours;
        match self.sources.iter_mut().find(|c| c.source == source) {
            Some(contribution) => contribution.hours += hours,
            None => self.sources.push(BonusContribution {
                source: source.to_string(),
                hours,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BonusTable {
    entries: HashMap<(String, String), BonusEntry>,
}

impl BonusTable {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = BonusRecord>,
    {
        let mut entries: HashMap<(String, String), BonusEntry> = HashMap::new();
        let mut inactive = 0usize;

        for record in records {
            if !record.is_active {
                inactive += 1;
                continue;
            }

            let key = (
                record.wp_type.trim().to_string(),
                record.aircraft_type.trim().to_string(),
            );
            entries
                .entry(key)
                .or_default()
                .add(&record.sheet, record.hours());
        }

        info!(entries = entries.len(), inactive, "奖励工时表构建完成");
        Self { entries }
    }

    pub fn get(&self, wp_type: &str, aircraft_type: &str) -> Option<&BonusEntry> {
        self.entries
            .get(&(wp_type.trim().to_string(), aircraft_type.trim().to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// ReferenceIds - 参考任务号 / EO 号集合
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceIds {
    pub task_ids: HashSet<String>,
    pub eo_ids: HashSet<String>,
}

impl ReferenceIds {
    pub fn new<T, E>(task_ids: T, eo_ids: E) -> Self
    where
        T: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        let normalize = |ids: Vec<String>| -> HashSet<String> {
            ids.into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        };

        Self {
            task_ids: normalize(task_ids.into_iter().collect()),
            eo_ids: normalize(eo_ids.into_iter().collect()),
        }
    }
}

// ==========================================
// LookupTables - 运行期只读查找表集合
// ==========================================
// 红线: 所有文件开始处理前构建完成，此后无写入方
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub aircraft_types: AircraftTypeIndex,
    pub coefficients: Option<CoefficientTable>, // None = 功能关闭，从不查询
    pub bonus: Option<BonusTable>,              // None = 功能关闭，从不查询
    pub reference_ids: ReferenceIds,
    pub ignore_list: IgnoreList,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeff(check: &str, ac: &str, func: &str, value: f64, active: bool) -> CoefficientRecord {
        CoefficientRecord {
            aircraft_code: ac.to_string(),
            check_group: check.to_string(),
            function_group: func.to_string(),
            coefficient: value,
            is_active: active,
        }
    }

    fn bonus(sheet: &str, wp: &str, ac: &str, values: Vec<f64>, active: bool) -> BonusRecord {
        BonusRecord {
            sheet: sheet.to_string(),
            wp_type: wp.to_string(),
            aircraft_type: ac.to_string(),
            values,
            is_active: active,
        }
    }

    #[test]
    fn test_coefficient_table_active_only() {
        let table = CoefficientTable::build(vec![
            coeff("A-CHECK", "B787", "DIS", 1.2, true),
            coeff("A-CHECK", "B787", "LUB", 3.0, false),
        ]);

        assert_eq!(table.get("A-CHECK", "B787", "DIS"), Some(1.2));
        assert_eq!(table.get("A-CHECK", "B787", "LUB"), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_coefficient_table_last_active_wins() {
        let table = CoefficientTable::build(vec![
            coeff("C-CHECK", "A320", "INS", 1.1, true),
            coeff("C-CHECK", "A320", "INS", 9.9, false),
            coeff("C-CHECK", "A320", "INS", 1.4, true),
        ]);

        assert_eq!(table.get("C-CHECK", "A320", "INS"), Some(1.4));
    }

    #[test]
    fn test_coefficient_table_rejects_non_positive() {
        let table = CoefficientTable::build(vec![
            coeff("A-CHECK", "B787", "DIS", -2.0, true),
            coeff("A-CHECK", "B787", "LUB", 0.0, true),
            coeff("A-CHECK", "B787", "INS", 1.3, true),
        ]);

        assert_eq!(table.get("A-CHECK", "B787", "DIS"), None);
        assert_eq!(table.get("A-CHECK", "B787", "LUB"), None);
        assert_eq!(table.get("A-CHECK", "B787", "INS"), Some(1.3));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bonus_negative_values_ignored() {
        let table = BonusTable::build(vec![bonus("Cabin", "A06", "B787", vec![2.0, -5.0], true)]);
        assert_eq!(table.get("A06", "B787").unwrap().total_hours, 2.0);
    }

    #[test]
    fn test_coefficient_table_exact_match_only() {
        let table = CoefficientTable::build(vec![coeff("A-CHECK", "B787", "DIS", 1.2, true)]);
        assert_eq!(table.get(" A-CHECK ", "B787", "DIS"), Some(1.2));
        assert_eq!(table.get("a-check", "B787", "DIS"), None);
        assert_eq!(table.get("A-CHECK", "B78", "DIS"), None);
    }

    #[test]
    fn test_bonus_table_sums_columns_and_sheets() {
        let table = BonusTable::build(vec![
            bonus("Cabin", "A06", "B787", vec![1.5, 0.5], true),
            bonus("Engine", "A06", "B787", vec![2.0], true),
            bonus("Cabin", "A06", "B787", vec![1.0], true),
            bonus("Engine", "A06", "B787", vec![100.0], false),
            bonus("Engine", "C01", "B787", vec![4.0], true),
        ]);

        let entry = table.get("A06", "B787").unwrap();
        assert_eq!(entry.total_hours, 5.0);
        assert_eq!(
            entry.sources,
            vec![
                BonusContribution { source: "Cabin".to_string(), hours: 3.0 },
                BonusContribution { source: "Engine".to_string(), hours: 2.0 },
            ]
        );
        assert!(table.get("A06", "A320").is_none());
    }

    #[test]
    fn test_bonus_pair_without_active_rows_is_absent() {
        let table = BonusTable::build(vec![bonus("S", "A06", "B787", vec![3.0], false)]);
        assert!(table.get("A06", "B787").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_aircraft_type_index() {
        let index = AircraftTypeIndex::build(vec![
            AircraftTypeRecord { registration: "9MMXA".to_string(), aircraft_type: "B787".to_string() },
            AircraftTypeRecord { registration: "".to_string(), aircraft_type: "A320".to_string() },
        ]);

        assert_eq!(index.get("9MMXA"), Some("B787"));
        assert_eq!(index.get("9MZZZ"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_reference_ids_drop_blanks() {
        let ids = ReferenceIds::new(
            vec![" 24-045-00 ".to_string(), "".to_string()],
            vec!["EO-1".to_string()],
        );
        assert!(ids.task_ids.contains("24-045-00"));
        assert_eq!(ids.task_ids.len(), 1);
        assert!(ids.eo_ids.contains("EO-1"));
    }
}
