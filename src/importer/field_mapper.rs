// ==========================================
// 工包工时核算系统 - 字段映射器
// ==========================================
// 职责: 配置列名 → WorkpackRow 字段
// 规则: 值保持原始字符串（trim），数值 / 日期解析留给引擎层，坏值不在此处报错
// ==========================================

use crate::config::settings::{ToolControlSettings, UploadedSheetSettings};
use crate::domain::workpack::{ColumnPresence, ToolFields, WorkpackRow};
use crate::importer::file_parser::{RawRecord, SheetData};

pub struct FieldMapper<'a> {
    columns: &'a UploadedSheetSettings,
    tool_columns: Option<&'a ToolControlSettings>,
}

impl<'a> FieldMapper<'a> {
    pub fn new(columns: &'a UploadedSheetSettings, tool_columns: Option<&'a ToolControlSettings>) -> Self {
        Self {
            columns,
            tool_columns,
        }
    }

    /// 必需列: SEQ / 标题 / 计划工时
    pub fn required_columns(&self) -> Vec<&'a str> {
        vec![
            self.columns.seq_no.as_str(),
            self.columns.title.as_str(),
            self.columns.planned_mhrs.as_str(),
        ]
    }

    pub fn column_presence(&self, sheet: &SheetData) -> ColumnPresence {
        let optional = |column: Option<&String>| column.is_some_and(|c| sheet.has_column(c));

        ColumnPresence {
            special_code: optional(self.columns.special_code.as_ref()),
            function_group: optional(self.columns.function_group.as_ref()),
            aircraft_info: sheet.has_column(&self.columns.aircraft_info),
            tool_control: self
                .tool_columns
                .is_some_and(|t| sheet.missing_columns(&tool_column_names(t)).is_empty()),
        }
    }

    pub fn map_row(&self, record: &RawRecord, presence: &ColumnPresence) -> WorkpackRow {
        let get = |column: &String| value(record, column);
        let get_optional = |column: Option<&String>| column.and_then(|c| value(record, c));

        WorkpackRow {
            row_number: record.row_number,
            seq_no: get(&self.columns.seq_no).unwrap_or_default(),
            title: get(&self.columns.title).unwrap_or_default(),
            planned_minutes: get(&self.columns.planned_mhrs),
            function_group: get_optional(self.columns.function_group.as_ref()),
            aircraft_info: get(&self.columns.aircraft_info),
            special_code: get_optional(self.columns.special_code.as_ref()),
            start_date: get(&self.columns.start_date),
            end_date: get(&self.columns.end_date),
            tool: self
                .tool_columns
                .filter(|_| presence.tool_control)
                .map(|t| ToolFields {
                    name: get(&t.tool_name),
                    tool_type: get(&t.tool_type),
                    part_no: get(&t.tool_partno),
                    total_qty: get(&t.total_qty),
                    alt_qty: get(&t.alt_qty),
                }),
        }
    }
}

fn value(record: &RawRecord, column: &str) -> Option<String> {
    record.get(column).map(str::to_string)
}

fn tool_column_names(columns: &ToolControlSettings) -> [&str; 5] {
    [
        columns.tool_name.as_str(),
        columns.tool_type.as_str(),
        columns.tool_partno.as_str(),
        columns.total_qty.as_str(),
        columns.alt_qty.as_str(),
    ]
}
