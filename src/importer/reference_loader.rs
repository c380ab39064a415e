// ==========================================
// 工包工时核算系统 - 参考数据加载器
// ==========================================
// 职责: 读取参考文件 → 参考记录 → LookupTables（运行开始时构建一次）
// 规则:
//   - 参考文件不存在（对应功能已启用）→ ConfigError::ReferenceNotFound（致命）
//   - 工作表 / 列缺失 → 警告，按空表继续
//   - 类型系数文件: 全部工作表合并读取
//   - 奖励工时文件: 按配置的工作表读取（空 = 全部），跨表累加；缺失的表单独跳过
//   - 系数 <= 0 / 奖励工时 < 0 → 警告，不进入查找表
// ==========================================

use crate::config::{AppConfig, ConfigError, ConfigResult};
use crate::domain::reference::{AircraftTypeRecord, BonusRecord, CoefficientRecord};
use crate::engine::lookup::{
    is_valid_coefficient, AircraftTypeIndex, BonusTable, CoefficientTable, LookupTables, ReferenceIds,
};
use crate::engine::tool_control::IgnoreList;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportError;
use crate::importer::file_parser::{FileParser, RawRecord, SheetData, UniversalFileParser};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct ReferenceLoader<'a> {
    config: &'a AppConfig,
    parser: UniversalFileParser,
    cleaner: DataCleaner,
}

impl<'a> ReferenceLoader<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            parser: UniversalFileParser,
            cleaner: DataCleaner,
        }
    }

    /// 构建全部查找表
    pub fn build_lookup_tables(&self) -> ConfigResult<LookupTables> {
        let reference_ids = self.load_reference_ids()?;
        let aircraft_types = AircraftTypeIndex::build(self.load_aircraft_types()?);

        let coefficients = match self.load_coefficients()? {
            Some(records) => Some(CoefficientTable::build(records)),
            None => None,
        };
        let bonus = match self.load_bonus()? {
            Some(records) => Some(BonusTable::build(records)),
            None => None,
        };

        Ok(LookupTables {
            aircraft_types,
            coefficients,
            bonus,
            reference_ids,
            ignore_list: self.load_ignore_list(),
        })
    }

    // ==========================================
    // 任务号 / EO 号
    // ==========================================
    pub fn load_reference_ids(&self) -> ConfigResult<ReferenceIds> {
        let path = &self.config.paths.reference_file;
        require_file("reference_file", path)?;

        let sheets = &self.config.reference_sheet;
        let task_ids = self.read_id_column(path, &sheets.task_sheet_name, &sheets.task_id_column)?;
        let eo_ids = self.read_id_column(path, &sheets.eo_sheet_name, &sheets.eo_id_column)?;

        let ids = ReferenceIds::new(task_ids, eo_ids);
        info!(task_ids = ids.task_ids.len(), eo_ids = ids.eo_ids.len(), "参考任务号加载完成");
        Ok(ids)
    }

    fn read_id_column(&self, path: &Path, sheet: &str, column: &str) -> ConfigResult<Vec<String>> {
        let Some(data) = self.read_sheet("reference_file", path, sheet)? else {
            return Ok(Vec::new());
        };
        if !data.has_column(column) {
            warn!(sheet = %sheet, column = %column, "参考表缺少列，按空集合处理");
            return Ok(Vec::new());
        }

        Ok(data
            .records
            .iter()
            .filter_map(|r| self.cleaner.normalize_null(r.get(column)))
            .collect())
    }

    // ==========================================
    // 注册号 → 机型
    // ==========================================
    pub fn load_aircraft_types(&self) -> ConfigResult<Vec<AircraftTypeRecord>> {
        let source = &self.config.aircraft_type;
        require_file("aircraft_type", &source.path)?;

        let Some(data) = self.read_sheet("aircraft_type", &source.path, &source.sheet)? else {
            return Ok(Vec::new());
        };
        if !self.has_columns(&data, &[source.registration_column.as_str(), source.type_column.as_str()]) {
            return Ok(Vec::new());
        }

        Ok(data
            .records
            .iter()
            .filter_map(|r| {
                Some(AircraftTypeRecord {
                    registration: self.cleaner.normalize_null(r.get(&source.registration_column))?,
                    aircraft_type: self.cleaner.normalize_null(r.get(&source.type_column))?,
                })
            })
            .collect())
    }

    // ==========================================
    // 类型系数（功能关闭 → None）
    // ==========================================
    pub fn load_coefficients(&self) -> ConfigResult<Option<Vec<CoefficientRecord>>> {
        let Some(source) = self.config.type_coefficient.as_ref() else {
            return Ok(None);
        };
        require_file("type_coefficient", &source.path)?;

        let sheets = self
            .parser
            .parse_all_sheets(&source.path, &[])
            .map_err(|e| unreadable("type_coefficient", e))?;

        let columns = &source.columns;
        let required = [
            columns.aircraft_column.as_str(),
            columns.check_group_column.as_str(),
            columns.function_column.as_str(),
            columns.coefficient_column.as_str(),
        ];

        let mut records = Vec::new();
        for sheet in &sheets {
            if !self.has_columns(sheet, &required) {
                continue;
            }
            let has_active = active_column_present(sheet, columns.active_column.as_deref());

            for record in &sheet.records {
                let aircraft_code = self.cleaner.normalize_null(record.get(&columns.aircraft_column));
                let check_group = self.cleaner.normalize_null(record.get(&columns.check_group_column));
                let function_group = self.cleaner.normalize_null(record.get(&columns.function_column));
                let coefficient = self.cleaner.parse_number(record.get(&columns.coefficient_column));

                let (Some(aircraft_code), Some(check_group), Some(function_group), Some(coefficient)) =
                    (aircraft_code, check_group, function_group, coefficient)
                else {
                    debug!(sheet = %sheet.name, row = record.row_number, "类型系数行不完整，跳过");
                    continue;
                };
                if !is_valid_coefficient(coefficient) {
                    warn!(sheet = %sheet.name, row = record.row_number, coefficient, "类型系数必须为正数，跳过");
                    continue;
                }

                records.push(CoefficientRecord {
                    aircraft_code,
                    check_group,
                    function_group,
                    coefficient,
                    is_active: self.is_active(record, columns.active_column.as_deref(), has_active),
                });
            }
        }

        info!(sheets = sheets.len(), records = records.len(), "类型系数参考读取完成");
        Ok(Some(records))
    }

    // ==========================================
    // 奖励工时（功能关闭 → None）
    // ==========================================
    pub fn load_bonus(&self) -> ConfigResult<Option<Vec<BonusRecord>>> {
        let Some(source) = self.config.bonus_hours.as_ref() else {
            return Ok(None);
        };
        require_file("bonus_hours", &source.path)?;

        let columns = &source.columns;
        let names = self
            .parser
            .select_sheet_names(&source.path, &columns.sheets)
            .map_err(|e| unreadable("bonus_hours", e))?;
        let sheets = read_sheets(&self.parser, "bonus_hours", &source.path, &names)?;

        let mut required = vec![
            columns.wp_type_column.as_str(),
            columns.aircraft_type_column.as_str(),
        ];
        required.extend(columns.bonus_columns.iter().map(String::as_str));

        let mut records = Vec::new();
        for sheet in &sheets {
            if !self.has_columns(sheet, &required) {
                continue;
            }
            let has_active = active_column_present(sheet, columns.active_column.as_deref());

            for record in &sheet.records {
                let (Some(wp_type), Some(aircraft_type)) = (
                    self.cleaner.normalize_null(record.get(&columns.wp_type_column)),
                    self.cleaner.normalize_null(record.get(&columns.aircraft_type_column)),
                ) else {
                    continue;
                };

                records.push(BonusRecord {
                    sheet: sheet.name.clone(),
                    wp_type,
                    aircraft_type,
                    values: columns
                        .bonus_columns
                        .iter()
                        .map(|c| self.bonus_value(sheet, record, c))
                        .collect(),
                    is_active: self.is_active(record, columns.active_column.as_deref(), has_active),
                });
            }
        }

        info!(sheets = sheets.len(), records = records.len(), "奖励工时参考读取完成");
        Ok(Some(records))
    }

    // ==========================================
    // 忽略清单（文件不存在 → 空清单）
    // ==========================================
    pub fn load_ignore_list(&self) -> IgnoreList {
        let Some(source) = self.config.tool_control.as_ref() else {
            return IgnoreList::default();
        };

        match std::fs::read_to_string(&source.ignore_path) {
            Ok(content) => {
                let list = IgnoreList::parse(&content);
                info!(items = list.len(), path = %source.ignore_path.display(), "忽略清单加载完成");
                list
            }
            Err(e) => {
                info!(path = %source.ignore_path.display(), error = %e, "忽略清单不可用，不忽略任何项");
                IgnoreList::default()
            }
        }
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 读取工作表；工作表不存在 → Ok(None) + 警告
    fn read_sheet(&self, feature: &str, path: &Path, sheet: &str) -> ConfigResult<Option<SheetData>> {
        match self.parser.parse_sheet(path, Some(sheet)) {
            Ok(data) => Ok(Some(data)),
            Err(ImportError::SheetNotFound { .. }) => {
                warn!(feature = %feature, sheet = %sheet, path = %path.display(), "参考工作表不存在，按空表处理");
                Ok(None)
            }
            Err(e) => Err(unreadable(feature, e)),
        }
    }

    /// 奖励工时值: 非数值 → 0；负值 → 警告并按 0
    fn bonus_value(&self, sheet: &SheetData, record: &RawRecord, column: &str) -> f64 {
        let value = self.cleaner.parse_number(record.get(column)).unwrap_or(0.0);
        if value < 0.0 {
            warn!(sheet = %sheet.name, row = record.row_number, column = %column, value, "奖励工时不能为负，按 0 处理");
            return 0.0;
        }
        value
    }

    fn has_columns(&self, sheet: &SheetData, columns: &[&str]) -> bool {
        let missing = sheet.missing_columns(columns);
        if missing.is_empty() {
            return true;
        }
        warn!(sheet = %sheet.name, missing = ?missing, available = ?sheet.headers, "参考表缺少列，跳过该表");
        false
    }

    /// 配置了启用列且该表存在此列时按列值过滤，否则全部视为有效
    fn is_active(&self, record: &RawRecord, column: Option<&str>, has_column: bool) -> bool {
        match column {
            Some(column) if has_column => self.cleaner.parse_active_flag(record.get(column)),
            _ => true,
        }
    }
}

/// 逐表读取；工作表不存在 → 警告并跳过该表，其余表照常读取
fn read_sheets(
    parser: &dyn FileParser,
    feature: &str,
    path: &Path,
    names: &[String],
) -> ConfigResult<Vec<SheetData>> {
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match parser.parse_sheet(path, Some(name)) {
            Ok(data) => sheets.push(data),
            Err(ImportError::SheetNotFound { .. }) => {
                warn!(feature = %feature, sheet = %name, path = %path.display(), "参考工作表不存在，跳过该表");
            }
            Err(e) => return Err(unreadable(feature, e)),
        }
    }
    Ok(sheets)
}

fn active_column_present(sheet: &SheetData, column: Option<&str>) -> bool {
    match column {
        Some(column) => {
            let present = sheet.has_column(column);
            if !present {
                debug!(sheet = %sheet.name, column = %column, "未找到启用列，全部行视为有效");
            }
            present
        }
        None => false,
    }
}

fn require_file(feature: &str, path: &Path) -> ConfigResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::ReferenceNotFound {
            feature: feature.to_string(),
            path: path.to_path_buf(),
        })
    }
}

fn unreadable(feature: &str, err: ImportError) -> ConfigError {
    ConfigError::ReferenceUnreadable {
        feature: feature.to_string(),
        message: err.to_string(),
    }
}
