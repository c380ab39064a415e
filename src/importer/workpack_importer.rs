// ==========================================
// 工包工时核算系统 - 工包导入器
// ==========================================
// 职责: 读取单个工包文件（第一个工作表）→ Workpack
// 失败: 文件无法解析 / 缺少必需列 / 无数据行 → ImportError（文件级）
// ==========================================

use crate::config::AppConfig;
use crate::domain::workpack::Workpack;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use std::path::Path;
use tracing::{debug, info, warn};

pub struct WorkpackImporter<'a> {
    parser: UniversalFileParser,
    mapper: FieldMapper<'a>,
}

impl<'a> WorkpackImporter<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: FieldMapper::new(
                &config.columns,
                config.tool_control.as_ref().map(|t| &t.columns),
            ),
        }
    }

    pub fn import(&self, path: &Path) -> ImportResult<Workpack> {
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let sheet = self.parser.parse_sheet(path, None)?;
        debug!(file = %source_name, sheet = %sheet.name, rows = sheet.records.len(), "工作表读取完成");

        let missing = sheet.missing_columns(&self.mapper.required_columns());
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns {
                file: source_name,
                columns: missing.into_iter().map(str::to_string).collect(),
            });
        }

        if sheet.records.is_empty() {
            return Err(ImportError::EmptyWorkpack(source_name));
        }

        let columns = self.mapper.column_presence(&sheet);
        if !columns.aircraft_info {
            warn!(file = %source_name, "机号信息列不存在，机型 / 工包类型无法确定");
        }

        let rows = sheet
            .records
            .iter()
            .map(|record| self.mapper.map_row(record, &columns))
            .collect::<Vec<_>>();

        info!(file = %source_name, rows = rows.len(), "工包导入完成");
        Ok(Workpack {
            source_name,
            rows,
            columns,
        })
    }
}
