// ==========================================
// 工包工时核算系统 - 工包领域模型
// ==========================================
// 用途: 导入层写入，引擎层只读
// 红线: 行记录为不可变输入，每个文件处理一次
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkpackRow - 工包任务行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkpackRow {
    pub row_number: usize, // 数据行号（从 1 开始，不含表头）

    // ===== 核心字段 =====
    pub seq_no: String,                  // SEQ（"<major>.<minor>"）
    pub title: String,                   // 任务标题
    pub planned_minutes: Option<String>, // 计划工时（分钟，原始值）
    pub function_group: Option<String>,  // 功能组（类型系数查找键）
    pub aircraft_info: Option<String>,   // 注册号 + 工包类型复合字段
    pub special_code: Option<String>,    // 特殊代码

    // ===== 工包周期 =====
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    // ===== 工具控制字段 =====
    pub tool: Option<ToolFields>,
}

// ==========================================
// ToolFields - 工具 / 航材字段
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolFields {
    pub name: Option<String>,
    pub tool_type: Option<String>,
    pub part_no: Option<String>,
    pub total_qty: Option<String>,
    pub alt_qty: Option<String>,
}

// ==========================================
// Workpack - 单个输入文件
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workpack {
    pub source_name: String,
    pub rows: Vec<WorkpackRow>,
    pub columns: ColumnPresence,
}

/// 可选列是否存在于输入文件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPresence {
    pub special_code: bool,
    pub function_group: bool,
    pub aircraft_info: bool,
    pub tool_control: bool,
}

// ==========================================
// AircraftInfo - 复合字段解析结果
// ==========================================
// 格式: "<registration>-...-<wp_type>"
// 规则: registration = 第一个 '-' 之前, wp_type = 最后一个 '-' 之后
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AircraftInfo {
    pub registration: String,
    pub wp_type: String,
}

impl AircraftInfo {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if !value.contains('-') {
            return Some(Self {
                registration: value.to_string(),
                wp_type: value.to_string(),
            });
        }

        let registration = value.split('-').next().unwrap_or_default().trim();
        let wp_type = value.rsplit('-').next().unwrap_or_default().trim();

        Some(Self {
            registration: registration.to_string(),
            wp_type: wp_type.to_string(),
        })
    }
}

// ==========================================
// WorkpackPeriod - 工包周期
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkpackPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64, // 含首尾两天
}

impl WorkpackPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            days: (end - start).num_days() + 1,
        }
    }

    /// 解析首行的起止日期；任一端无法解析返回 None
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(parse_date(start)?, parse_date(end)?))
    }
}

// Excel 序列日期基准（1899-12-30，兼容 1900 闰年问题）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 解析日期
///
/// 支持: YYYY-MM-DD / YYYY-MM-DD HH:MM:SS / YYYY-MM-DDTHH:MM:SS / YYYYMMDD /
/// DD/MM/YYYY / Excel 序列日期（如 45717 或 45717.5）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    if value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Some(date);
    }

    excel_serial_date(value)
}

fn excel_serial_date(value: &str) -> Option<NaiveDate> {
    let serial: f64 = value.parse().ok()?;
    if !serial.is_finite() || !(1.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aircraft_info_parse_composite() {
        let info = AircraftInfo::parse("9MMXA-ENG-BASE-A06").unwrap();
        assert_eq!(info.registration, "9MMXA");
        assert_eq!(info.wp_type, "A06");

        let info = AircraftInfo::parse("9MABC - 2025 - C01 ").unwrap();
        assert_eq!(info.registration, "9MABC");
        assert_eq!(info.wp_type, "C01");
    }

    #[test]
    fn test_aircraft_info_parse_no_dash() {
        let info = AircraftInfo::parse("SOLO").unwrap();
        assert_eq!(info.registration, "SOLO");
        assert_eq!(info.wp_type, "SOLO");
    }

    #[test]
    fn test_aircraft_info_parse_empty() {
        assert_eq!(AircraftInfo::parse("   "), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_date("2025-03-01"), expected);
        assert_eq!(parse_date("2025-03-01 08:30:00"), expected);
        assert_eq!(parse_date("2025-03-01T08:30:00"), expected);
        assert_eq!(parse_date("20250301"), expected);
        assert_eq!(parse_date("01/03/2025"), expected);
        assert_eq!(parse_date("45717"), expected);
        assert_eq!(parse_date("45717.75"), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next week"), None);
        assert_eq!(parse_date("-3"), None);
    }

    #[test]
    fn test_workpack_period_parse() {
        let period = WorkpackPeriod::parse("2025-03-01", "20250304").unwrap();
        assert_eq!(period.days, 4);
        assert!(WorkpackPeriod::parse("2025-03-01", "?").is_none());
    }

    #[test]
    fn test_workpack_period_inclusive_days() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(WorkpackPeriod::new(start, end).days, 3);
        assert_eq!(WorkpackPeriod::new(start, start).days, 1);
    }
}
