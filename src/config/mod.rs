// ==========================================
// 工包工时核算系统 - 配置层
// ==========================================
// 职责: settings.toml 加载、校验、转换为 AppConfig
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod error;
pub mod settings;

pub use app_config::{
    AircraftTypeSource, AppConfig, BonusSource, CoefficientSource, FeatureToggles, ResolvedPaths,
    ToolControlSource,
};
pub use config_manager::{locate_settings, ConfigManager, SETTINGS_FILE_NAME};
pub use error::{ConfigError, ConfigResult};
pub use settings::Settings;
