// ==========================================
// 工包工时核算系统 - 运行编排器
// ==========================================
// 职责: 查找表构建一次 → 逐文件 导入 → 计算 → 报表 → 运行汇总
// 红线:
//   - 配置 / 参考数据错误致命（构建 Runner 时即失败）
//   - 单文件失败只记录，不影响其余文件（stop_on_file_error 除外）
//   - 文件按文件名排序处理，结果可复现
// ==========================================

use crate::config::{AppConfig, ConfigResult};
use crate::engine::lookup::LookupTables;
use crate::engine::processor::WorkpackProcessor;
use crate::importer::error::ImportError;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::reference_loader::ReferenceLoader;
use crate::importer::workpack_importer::WorkpackImporter;
use crate::report::error::ReportError;
use crate::report::writer::ReportWriter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

// ==========================================
// 错误类型
// ==========================================

/// 单文件处理失败（文件级，可恢复）
#[derive(Error, Debug)]
pub enum FileProcessingError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// 运行级失败（致命）
#[derive(Error, Debug)]
pub enum RunError {
    #[error("输入目录无法读取 ({path}): {message}")]
    InputFolder { path: PathBuf, message: String },
}

// ==========================================
// 运行汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Succeeded {
        total_hours: f64,
        new_identifiers: usize,
        issues: usize,
        report_folder: PathBuf,
    },
    Failed {
        message: String,
    },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub outcomes: Vec<FileOutcome>,
    pub stopped_early: bool, // stop_on_file_error 触发
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Succeeded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped))
    }

    /// 全部文件成功（无输入文件也视为成功）
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && !self.stopped_early
    }
}

// ==========================================
// Runner
// ==========================================
pub struct Runner<'a> {
    config: &'a AppConfig,
    tables: LookupTables,
    run_id: Uuid,
}

impl<'a> Runner<'a> {
    /// 构建查找表（参考数据错误在此处终止运行）
    pub fn new(config: &'a AppConfig) -> ConfigResult<Self> {
        let tables = ReferenceLoader::new(config).build_lookup_tables()?;
        Ok(Self::with_tables(config, tables))
    }

    pub fn with_tables(config: &'a AppConfig, tables: LookupTables) -> Self {
        Self {
            config,
            tables,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn run(&self) -> Result<RunSummary, RunError> {
        let files = discover_input_files(&self.config.paths.input_folder)?;
        info!(run_id = %self.run_id, files = files.len(), "开始处理工包文件");
        if files.is_empty() {
            warn!(folder = %self.config.paths.input_folder.display(), "输入目录中没有工包文件");
        }

        let mut outcomes = Vec::with_capacity(files.len());
        let mut stopped_early = false;

        for file in files {
            if stopped_early {
                outcomes.push(FileOutcome {
                    file,
                    status: FileStatus::Skipped,
                });
                continue;
            }

            let status = match self.process_file(&file) {
                Ok(status) => status,
                Err(e) => {
                    error!(file = %file.display(), error = %e, "工包文件处理失败");
                    if self.config.features.stop_on_file_error {
                        warn!("stop_on_file_error 已启用，跳过剩余文件");
                        stopped_early = true;
                    }
                    FileStatus::Failed {
                        message: e.to_string(),
                    }
                }
            };
            outcomes.push(FileOutcome { file, status });
        }

        let summary = RunSummary {
            run_id: self.run_id,
            outcomes,
            stopped_early,
        };
        info!(
            run_id = %self.run_id,
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "运行结束"
        );
        Ok(summary)
    }

    /// 单文件: 导入 → 计算 → 报表
    pub fn process_file(&self, path: &Path) -> Result<FileStatus, FileProcessingError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let span = info_span!("workpack", run_id = %self.run_id, file = %file_name);
        let _guard = span.enter();

        let workpack = WorkpackImporter::new(self.config).import(path)?;
        let result = WorkpackProcessor::new(self.config, &self.tables).process(&workpack);

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let output = ReportWriter::new(&self.config.paths.output_folder, &self.config.paths.log_folder)
            .write(&stem, &timestamp, &result)?;

        info!(total_hours = result.totals.total_hours, folder = %output.folder.display(), "工包文件处理成功");
        Ok(FileStatus::Succeeded {
            total_hours: result.totals.total_hours,
            new_identifiers: result.new_identifiers.len(),
            issues: result.issues.len(),
            report_folder: output.folder,
        })
    }
}

/// 输入目录下受支持的工包文件（按文件名排序；Excel 临时锁文件 "~$" 忽略）
pub fn discover_input_files(folder: &Path) -> Result<Vec<PathBuf>, RunError> {
    let read_error = |e: std::io::Error| RunError::InputFolder {
        path: folder.to_path_buf(),
        message: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let is_lock_file = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with("~$"));
        if path.is_file() && !is_lock_file && UniversalFileParser::is_supported(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
