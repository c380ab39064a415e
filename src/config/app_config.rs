// ==========================================
// 工包工时核算系统 - 运行期配置
// ==========================================
// 职责: 校验 Settings 并一次性转换为各组件使用的类型化配置
// 红线:
//   - AppConfig 构建后不可变，显式传入各组件构造函数
//   - 字符串分派（SEQ 分类 / 提取规则）在此处全部转换为枚举
//   - 启用的功能缺少配置段 → ConfigError（致命）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::settings::{
    BonusHoursSettings, ReferenceSheetSettings, Settings, ToolControlSettings,
    TypeCoefficientSettings, UploadedSheetSettings,
};
use crate::domain::types::{CoefficientMode, IdRule, SeqClass};
use crate::engine::id_extractor::SeqRules;
use crate::engine::normalizer::CheckGroupMap;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

// ==========================================
// 路径
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPaths {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub reference_folder: PathBuf,
    pub reference_file: PathBuf,
    pub log_folder: PathBuf,
}

// ==========================================
// 功能开关
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureToggles {
    pub special_code: bool,
    pub tool_control: bool,
    pub type_coefficient: bool,
    pub bonus_hours: bool,
    pub stop_on_file_error: bool,
}

// ==========================================
// 参考数据来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftTypeSource {
    pub path: PathBuf,
    pub sheet: String,
    pub registration_column: String,
    pub type_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientSource {
    pub path: PathBuf,
    pub columns: TypeCoefficientSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusSource {
    pub path: PathBuf,
    pub columns: BonusHoursSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolControlSource {
    pub ignore_path: PathBuf,
    pub columns: ToolControlSettings,
}

// ==========================================
// AppConfig
// ==========================================
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub paths: ResolvedPaths,
    pub features: FeatureToggles,
    pub mode: CoefficientMode,
    pub seq_rules: SeqRules,
    pub check_groups: CheckGroupMap,
    pub high_hours_threshold: f64,
    pub sample_size: usize,

    pub reference_sheet: ReferenceSheetSettings,
    pub columns: UploadedSheetSettings,
    pub aircraft_type: AircraftTypeSource,
    pub type_coefficient: Option<CoefficientSource>, // None = 功能关闭
    pub bonus_hours: Option<BonusSource>,            // None = 功能关闭
    pub tool_control: Option<ToolControlSource>,     // None = 功能关闭
}

impl AppConfig {
    pub fn from_settings(settings: &Settings) -> ConfigResult<Self> {
        let paths = resolve_paths(settings);
        let processing = &settings.processing;

        let features = FeatureToggles {
            special_code: processing.enable_special_code,
            tool_control: processing.enable_tool_control,
            type_coefficient: processing.enable_type_coefficient,
            bonus_hours: processing.enable_bonus_hours,
            stop_on_file_error: processing.stop_on_file_error,
        };

        let threshold = settings.thresholds.high_mhrs_hours;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "thresholds.high_mhrs_hours",
                threshold.to_string(),
                "必须为正数",
            ));
        }

        let aircraft_type = AircraftTypeSource {
            path: settings
                .aircraft_type
                .file
                .as_deref()
                .map(|f| paths.reference_folder.join(f))
                .unwrap_or_else(|| paths.reference_file.clone()),
            sheet: settings.aircraft_type.sheet.clone(),
            registration_column: settings.aircraft_type.registration_column.clone(),
            type_column: settings.aircraft_type.type_column.clone(),
        };

        let type_coefficient = if features.type_coefficient {
            let columns = required_section(
                settings.type_coefficient.as_ref(),
                "type_coefficient",
                "processing.enable_type_coefficient = true",
            )?;
            Some(CoefficientSource {
                path: paths.reference_folder.join(&columns.file),
                columns: columns.clone(),
            })
        } else {
            None
        };

        let bonus_hours = if features.bonus_hours {
            let columns = required_section(
                settings.bonus_hours.as_ref(),
                "bonus_hours",
                "processing.enable_bonus_hours = true",
            )?;
            let count = columns.bonus_columns.len();
            if !(1..=2).contains(&count) {
                return Err(ConfigError::invalid(
                    "bonus_hours.bonus_columns",
                    format!("{:?}", columns.bonus_columns),
                    "奖励列数量必须为 1 或 2",
                ));
            }
            Some(BonusSource {
                path: paths.reference_folder.join(&columns.file),
                columns: columns.clone(),
            })
        } else {
            None
        };

        let tool_control = if features.tool_control {
            let columns = required_section(
                settings.tool_control.as_ref(),
                "tool_control",
                "processing.enable_tool_control = true",
            )?;
            Some(ToolControlSource {
                ignore_path: paths.reference_folder.join(&columns.ignore_file),
                columns: columns.clone(),
            })
        } else {
            None
        };

        Ok(Self {
            paths,
            features,
            mode: CoefficientMode::from_per_seq_flag(processing.type_coefficient_per_seq),
            seq_rules: build_seq_rules(settings)?,
            check_groups: build_check_groups(settings)?,
            high_hours_threshold: threshold,
            sample_size: settings.thresholds.random_sample_size,
            reference_sheet: settings.reference_sheet.clone(),
            columns: settings.uploaded_sheet.clone(),
            aircraft_type,
            type_coefficient,
            bonus_hours,
            tool_control,
        })
    }

    pub fn eo_prefix(&self) -> &str {
        self.reference_sheet.eo_prefix.trim()
    }
}

fn resolve_paths(settings: &Settings) -> ResolvedPaths {
    let paths = &settings.paths;
    let reference_folder = PathBuf::from(&paths.reference_folder);
    ResolvedPaths {
        input_folder: PathBuf::from(&paths.input_folder),
        output_folder: PathBuf::from(&paths.output_folder),
        reference_file: reference_folder.join(&paths.reference_file),
        reference_folder,
        log_folder: PathBuf::from(&paths.log_folder),
    }
}

fn required_section<'a, T>(section: Option<&'a T>, name: &str, reason: &str) -> ConfigResult<&'a T> {
    section.ok_or_else(|| ConfigError::MissingSection {
        section: name.to_string(),
        reason: reason.to_string(),
    })
}

/// SEQ 大类键规范化: "2" / "SEQ_2.X" / "SEQ_2.X_ID" → "2"
fn segment_key(raw: &str) -> String {
    let key = raw.trim();
    let key = key
        .strip_prefix("SEQ_")
        .or_else(|| key.strip_prefix("seq_"))
        .unwrap_or(key);
    let key = key
        .strip_suffix(".X_ID")
        .or_else(|| key.strip_suffix(".X"))
        .unwrap_or(key);
    key.trim().to_string()
}

fn build_seq_rules(settings: &Settings) -> ConfigResult<SeqRules> {
    let mut classes = HashMap::new();
    for (raw_key, value) in &settings.seq_mappings {
        let class = SeqClass::from_setting(value).ok_or_else(|| {
            ConfigError::invalid(
                format!("seq_mappings.{}", raw_key),
                value.clone(),
                "仅支持 true / false / ignore",
            )
        })?;
        classes.insert(segment_key(raw_key), class);
    }

    let mut rules = HashMap::new();
    for (raw_key, value) in &settings.seq_id_mappings {
        let rule = IdRule::from_setting(value).ok_or_else(|| {
            ConfigError::invalid(
                format!("seq_id_mappings.{}", raw_key),
                value.clone(),
                "仅支持 \"-\"（取括号前）或 \"/\"（取斜杠前）",
            )
        })?;
        rules.insert(segment_key(raw_key), rule);
    }

    Ok(SeqRules::new(classes, rules))
}

fn build_check_groups(settings: &Settings) -> ConfigResult<CheckGroupMap> {
    let mut groups = HashMap::new();
    for (key, group) in &settings.check_groups {
        let mut chars = key.trim().chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(letter), None) => letter,
            _ => {
                return Err(ConfigError::invalid(
                    format!("check_groups.{}", key),
                    group.clone(),
                    "检查组键必须为单个字符",
                ))
            }
        };
        groups.insert(letter, group.clone());
    }
    Ok(CheckGroupMap::new(groups))
}
