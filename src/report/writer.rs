// ==========================================
// 工包工时核算系统 - 报表写入器
// ==========================================
// 输出目录: <output>/<file-stem>/<file-stem>_<timestamp>/
//   - 每张报表一个 CSV（flexible: 行长度可不一致）
//   - summary.json: ProcessingResult 完整序列化
// 调试日志: <log_folder>/<file-stem>/debug_<timestamp>.txt
// ==========================================

use crate::domain::result::ProcessingResult;
use crate::report::debug_log;
use crate::report::error::{ReportError, ReportResult};
use crate::report::sheets::{self, Sheet};
use csv::WriterBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// 单个文件的报表输出
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
    pub debug_log: PathBuf,
}

pub struct ReportWriter {
    output_folder: PathBuf,
    log_folder: PathBuf,
}

impl ReportWriter {
    pub fn new(output_folder: impl Into<PathBuf>, log_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            log_folder: log_folder.into(),
        }
    }

    pub fn write(&self, file_stem: &str, timestamp: &str, result: &ProcessingResult) -> ReportResult<ReportOutput> {
        let folder = self
            .output_folder
            .join(file_stem)
            .join(format!("{}_{}", file_stem, timestamp));
        std::fs::create_dir_all(&folder).map_err(|e| ReportError::CreateDir {
            path: folder.clone(),
            message: e.to_string(),
        })?;

        let mut files = Vec::new();
        for sheet in sheets::build_all(result) {
            files.push(write_sheet(&folder, &sheet)?);
        }
        files.push(write_summary(&folder, result)?);

        let debug_log = debug_log::write_debug_log(&self.log_folder, file_stem, timestamp, result)?;

        info!(
            file = %result.source_name,
            folder = %folder.display(),
            reports = files.len(),
            "报表已生成"
        );

        Ok(ReportOutput {
            folder,
            files,
            debug_log,
        })
    }
}

fn write_sheet(folder: &Path, sheet: &Sheet) -> ReportResult<PathBuf> {
    let path = folder.join(format!("{}.csv", sheet.name));

    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|e| csv_error(&path, e))?;
    for row in &sheet.rows {
        writer.write_record(row).map_err(|e| csv_error(&path, e))?;
    }
    writer.flush().map_err(|e| csv_error(&path, e))?;

    Ok(path)
}

fn csv_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn write_summary(folder: &Path, result: &ProcessingResult) -> ReportResult<PathBuf> {
    let path = folder.join(SUMMARY_FILE_NAME);
    let json_error = |message: String| ReportError::Json {
        path: path.clone(),
        message,
    };

    let json = serde_json::to_string_pretty(result).map_err(|e| json_error(e.to_string()))?;
    std::fs::write(&path, json).map_err(|e| json_error(e.to_string()))?;
    Ok(path)
}
