// ==========================================
// 工包工时核算系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值与标志位解析
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 空白 / "nan" / "none" 视为缺失
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty()
                || trimmed.eq_ignore_ascii_case("nan")
                || trimmed.eq_ignore_ascii_case("none")
            {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 数值解析（非数值 → None）
    pub fn parse_number(&self, value: Option<&str>) -> Option<f64> {
        self.normalize_null(value)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 启用标志（TRUE / 1 / Y / YES / 是）
    pub fn parse_active_flag(&self, value: Option<&str>) -> bool {
        match self.normalize_null(value) {
            Some(v) => matches!(
                v.to_uppercase().as_str(),
                "TRUE" | "1" | "1.0" | "Y" | "YES" | "是"
            ),
            None => false,
        }
    }
}
