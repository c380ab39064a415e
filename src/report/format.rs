// ==========================================
// 工包工时核算系统 - 报表显示格式
// ==========================================

use crate::domain::workpack::WorkpackPeriod;

pub const NOT_AVAILABLE: &str = "N/A";

/// 小时 → "HH:MM"（按分钟四舍五入；负值带 "-" 前缀）
pub fn hours_to_hhmm(hours: f64) -> String {
    if !hours.is_finite() {
        return "00:00".to_string();
    }

    let total_minutes = (hours.abs() * 60.0).round() as u64;
    let sign = if hours < 0.0 && total_minutes > 0 { "-" } else { "" };
    format!("{}{:02}:{:02}", sign, total_minutes / 60, total_minutes % 60)
}

/// 两位小数
pub fn decimal(hours: f64) -> String {
    format!("{:.2}", hours)
}

pub fn percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn period_range(period: Option<&WorkpackPeriod>) -> String {
    match period {
        Some(p) => format!("{} to {}", p.start.format("%Y-%m-%d"), p.end.format("%Y-%m-%d")),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_to_hhmm() {
        assert_eq!(hours_to_hhmm(36.5), "36:30");
        assert_eq!(hours_to_hhmm(2.25), "02:15");
        assert_eq!(hours_to_hhmm(0.0), "00:00");
        assert_eq!(hours_to_hhmm(1.0 / 60.0 * 59.6), "01:00");
    }

    #[test]
    fn test_hours_to_hhmm_negative() {
        assert_eq!(hours_to_hhmm(-1.5), "-01:30");
        // 四舍五入后为 0 时不带符号
        assert_eq!(hours_to_hhmm(-0.001), "00:00");
    }

    #[test]
    fn test_decimal_and_percentage() {
        assert_eq!(decimal(1.004), "1.00");
        assert_eq!(decimal(8.5), "8.50");
        assert_eq!(percentage(37.54), "37.5%");
    }
}
