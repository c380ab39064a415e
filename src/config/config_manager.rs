// ==========================================
// 工包工时核算系统 - 配置管理器
// ==========================================
// 职责: 定位配置文件、加载、校验、输出配置快照
// 查找顺序:
//   1. 命令行 --settings
//   2. 当前目录 ./settings.toml
//   3. <config_dir>/workpack-mhrs/settings.toml
// ==========================================

use crate::config::app_config::AppConfig;
use crate::config::error::{ConfigError, ConfigResult};
use crate::config::settings::Settings;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SETTINGS_FILE_NAME: &str = "settings.toml";
const CONFIG_DIR_NAME: &str = "workpack-mhrs";

// ==========================================
// ConfigManager
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: PathBuf,
    settings: Settings,
    config: AppConfig,
}

impl ConfigManager {
    /// 按查找顺序定位并加载配置
    pub fn load(cli_path: Option<&Path>) -> ConfigResult<Self> {
        let path = locate_settings(cli_path)?;
        Self::from_path(&path)
    }

    /// 从指定路径加载配置
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let settings = Settings::from_toml(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = AppConfig::from_settings(&settings)?;
        info!(path = %path.display(), "配置加载完成");

        Ok(Self {
            settings_path: path.to_path_buf(),
            settings,
            config,
        })
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// 配置快照（JSON 格式）
    pub fn snapshot_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(&self.settings).map_err(|e| ConfigError::Parse {
            path: self.settings_path.clone(),
            message: e.to_string(),
        })
    }

    /// 输出生效配置
    pub fn log_summary(&self) {
        let config = &self.config;
        info!(
            input = %config.paths.input_folder.display(),
            output = %config.paths.output_folder.display(),
            reference = %config.paths.reference_file.display(),
            mode = %config.mode,
            high_hours_threshold = config.high_hours_threshold,
            "生效配置"
        );
        info!(
            special_code = config.features.special_code,
            tool_control = config.features.tool_control,
            type_coefficient = config.features.type_coefficient,
            bonus_hours = config.features.bonus_hours,
            stop_on_file_error = config.features.stop_on_file_error,
            "功能开关"
        );
        debug!(
            seq_classes = config.seq_rules.class_count(),
            seq_rules = config.seq_rules.rule_count(),
            check_groups = config.check_groups.len(),
            "SEQ / 检查组映射"
        );
    }
}

/// 定位配置文件
pub fn locate_settings(cli_path: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(path) = cli_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::NotFound {
            searched: path.display().to_string(),
        });
    }

    let mut searched = Vec::new();
    for candidate in default_candidates() {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "找到配置文件");
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }

    Err(ConfigError::NotFound {
        searched: searched.join(", "),
    })
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SETTINGS: &str = r#"
[paths]
input_folder = "INPUT"
output_folder = "OUTPUT"
reference_folder = "REFERENCE"
reference_file = "reference.csv"

[processing]
type_coefficient_per_seq = false

[reference_sheet]
task_sheet_name = "Task"
task_id_column = "Task ID"
eo_sheet_name = "EO"
eo_id_column = "EO ID"
eo_prefix = "EO-"

[uploaded_sheet]
seq_no = "Seq. No."
title = "Title"
planned_mhrs = "Planned Mhrs"
aircraft_info = "Aircraft"

[aircraft_type]
sheet = "Fleet"
registration_column = "Registration"
type_column = "Type"

[thresholds]
high_mhrs_hours = 4.0

[check_groups]
A = "A-CHECK"

[seq_mappings]
"2" = "true"
"#;

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SETTINGS.as_bytes()).unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.config().high_hours_threshold, 4.0);
        assert_eq!(manager.settings_path(), file.path());
        assert!(manager.snapshot_json().unwrap().contains("high_mhrs_hours"));
    }

    #[test]
    fn test_explicit_path_missing_is_not_found() {
        let err = locate_settings(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[paths\ninput_folder = ").unwrap();
        let err = ConfigManager::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
