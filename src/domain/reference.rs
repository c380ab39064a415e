// ==========================================
// 工包工时核算系统 - 参考数据记录
// ==========================================
// 用途: 参考数据读取层产出，查找表构建阶段消费
// ==========================================

use serde::{Deserialize, Serialize};

/// 注册号 → 机型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftTypeRecord {
    pub registration: String,
    pub aircraft_type: String,
}

/// 类型系数参考行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRecord {
    pub aircraft_code: String,
    pub check_group: String,
    pub function_group: String,
    pub coefficient: f64,
    pub is_active: bool,
}

/// 奖励工时参考行（values 与配置的奖励列一一对应）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRecord {
    pub sheet: String,
    pub wp_type: String,
    pub aircraft_type: String,
    pub values: Vec<f64>,
    pub is_active: bool,
}

impl BonusRecord {
    /// 负值不计入
    pub fn hours(&self) -> f64 {
        self.values.iter().filter(|v| **v >= 0.0).sum()
    }
}
