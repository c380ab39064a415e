// ==========================================
// 工包工时核算系统 - 配置文件模型 (settings.toml)
// ==========================================
// 职责: 与配置文件一一对应的 serde 结构，只做反序列化与默认值
// 校验与类型转换在 app_config.rs 完成
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub paths: PathsSettings,
    #[serde(default)]
    pub processing: ProcessingSettings,
    pub reference_sheet: ReferenceSheetSettings,
    pub uploaded_sheet: UploadedSheetSettings,
    pub aircraft_type: AircraftTypeSettings,
    pub type_coefficient: Option<TypeCoefficientSettings>,
    pub bonus_hours: Option<BonusHoursSettings>,
    pub tool_control: Option<ToolControlSettings>,
    pub thresholds: ThresholdSettings,
    pub check_groups: BTreeMap<String, String>,
    pub seq_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub seq_id_mappings: BTreeMap<String, String>,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

// ===== [paths] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsSettings {
    pub input_folder: String,
    pub output_folder: String,
    pub reference_folder: String,
    pub reference_file: String,
    #[serde(default = "default_log_folder")]
    pub log_folder: String,
}

// ===== [processing] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSettings {
    #[serde(default)]
    pub enable_special_code: bool,
    #[serde(default)]
    pub enable_tool_control: bool,
    #[serde(default)]
    pub enable_type_coefficient: bool,
    #[serde(default)]
    pub enable_bonus_hours: bool,
    #[serde(default = "default_true")]
    pub type_coefficient_per_seq: bool,
    #[serde(default)]
    pub stop_on_file_error: bool,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            enable_special_code: false,
            enable_tool_control: false,
            enable_type_coefficient: false,
            enable_bonus_hours: false,
            type_coefficient_per_seq: true,
            stop_on_file_error: false,
        }
    }
}

// ===== [reference_sheet] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSheetSettings {
    pub task_sheet_name: String,
    pub task_id_column: String,
    pub eo_sheet_name: String,
    pub eo_id_column: String,
    pub eo_prefix: String,
}

// ===== [uploaded_sheet] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedSheetSettings {
    pub seq_no: String,
    pub title: String,
    pub planned_mhrs: String,
    pub aircraft_info: String,
    pub special_code: Option<String>,
    pub function_group: Option<String>,
    #[serde(default = "default_start_date")]
    pub start_date: String,
    #[serde(default = "default_end_date")]
    pub end_date: String,
}

// ===== [aircraft_type] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftTypeSettings {
    pub file: Option<String>, // 缺省使用 paths.reference_file
    pub sheet: String,
    pub registration_column: String,
    pub type_column: String,
}

// ===== [type_coefficient] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCoefficientSettings {
    pub file: String,
    pub aircraft_column: String,
    pub check_group_column: String,
    pub function_column: String,
    pub coefficient_column: String,
    pub active_column: Option<String>,
}

// ===== [bonus_hours] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusHoursSettings {
    pub file: String,
    #[serde(default)]
    pub sheets: Vec<String>, // 空 = 全部 sheet
    pub wp_type_column: String,
    pub aircraft_type_column: String,
    pub bonus_columns: Vec<String>,
    pub active_column: Option<String>,
}

// ===== [tool_control] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolControlSettings {
    pub tool_name: String,
    pub tool_type: String,
    pub tool_partno: String,
    pub total_qty: String,
    pub alt_qty: String,
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
}

// ===== [thresholds] =====
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSettings {
    pub high_mhrs_hours: f64,
    #[serde(default = "default_sample_size")]
    pub random_sample_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_log_folder() -> String {
    "LOG".to_string()
}

fn default_start_date() -> String {
    "Start_date".to_string()
}

fn default_end_date() -> String {
    "End_date".to_string()
}

fn default_ignore_file() -> String {
    "ignore_item.txt".to_string()
}

fn default_sample_size() -> usize {
    10
}
