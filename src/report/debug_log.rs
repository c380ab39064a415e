// ==========================================
// 工包工时核算系统 - 调试日志
// ==========================================
// 路径: <log_folder>/<file-stem>/debug_<timestamp>.txt
// 内容: 文件头 / 工时摘要 / 行数统计 / 抽样行 / 行级问题清单
// ==========================================

use crate::domain::result::{ProcessedRow, ProcessingResult};
use crate::domain::types::IssueLevel;
use crate::report::error::{ReportError, ReportResult};
use crate::report::format::{hours_to_hhmm, period_range};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

const RULE_WIDTH: usize = 110;

/// 写入调试日志，返回文件路径
pub fn write_debug_log(
    log_folder: &Path,
    file_stem: &str,
    timestamp: &str,
    result: &ProcessingResult,
) -> ReportResult<PathBuf> {
    let folder = log_folder.join(file_stem);
    std::fs::create_dir_all(&folder).map_err(|e| ReportError::CreateDir {
        path: folder.clone(),
        message: e.to_string(),
    })?;

    let path = folder.join(format!("debug_{}.txt", timestamp));
    std::fs::write(&path, render(result, timestamp)).map_err(|e| ReportError::DebugLog {
        path: path.clone(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), "调试日志已写入");
    Ok(path)
}

/// 渲染调试日志文本
pub fn render(result: &ProcessingResult, timestamp: &str) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);
    let line = "-".repeat(RULE_WIDTH);

    // write! 到 String 不会失败
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "DEBUG LOG");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "File: {}", result.source_name);
    let _ = writeln!(out, "Run Timestamp: {}", timestamp);
    if let Some(period) = result.period.as_ref() {
        let _ = writeln!(out, "Workpack Period: {}", period_range(Some(period)));
        let _ = writeln!(out, "Workpack Duration: {} days", period.days);
    }
    let _ = writeln!(out, "Coefficient Mode: {}", result.mode);

    let totals = &result.totals;
    let _ = writeln!(out);
    let _ = writeln!(out, "Man-Hours Summary:");
    let _ = writeln!(out, "Base Man-Hours: {}", hours_to_hhmm(totals.base_hours));
    let _ = writeln!(out, "Coefficient Delta: {}", hours_to_hhmm(totals.coefficient_delta));
    let _ = writeln!(out, "Bonus Hours: {}", hours_to_hhmm(totals.bonus_hours));
    let _ = writeln!(out, "Total Man-Hours: {}", hours_to_hhmm(totals.total_hours));

    let counts = &result.row_counts;
    let _ = writeln!(
        out,
        "Rows: total {} / processed {} / unique {} / skipped {}",
        counts.total, counts.processed, counts.unique, counts.skipped
    );
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);

    // ===== 抽样 =====
    if result.debug_sample.is_empty() {
        let _ = writeln!(out, "No data to display (all rows were skipped)");
    } else {
        let _ = writeln!(out, "DEBUG SAMPLE ({} rows):", result.debug_sample.len());
        let _ = writeln!(out, "{}", line);
        let _ = writeln!(
            out,
            "| {:<8} | {:<30} | {:<12} | {:<16} | {:<5} | {:>9} | {:>13} |",
            "SEQ", "Title", "Special Code", "Task ID", "Coeff", "Base Mhrs", "Adjusted Mhrs"
        );
        let _ = writeln!(out, "{}", line);
        for row in &result.debug_sample {
            let _ = writeln!(out, "{}", sample_line(row));
        }
        let _ = writeln!(out, "{}", line);
    }

    // ===== 行级问题 =====
    let _ = writeln!(out);
    if result.issues.is_empty() {
        let _ = writeln!(out, "No row issues");
    } else {
        let _ = writeln!(out, "ROW ISSUES ({}):", result.issues.len());
        for issue in &result.issues {
            let level = match issue.level {
                IssueLevel::Warning => "WARN",
                IssueLevel::Info => "INFO",
            };
            let location = match (issue.row_number, issue.seq_no.as_deref()) {
                (Some(row), Some(seq)) => format!("row {} seq {}", row, seq),
                (Some(row), None) => format!("row {}", row),
                _ => "file".to_string(),
            };
            let _ = writeln!(out, "[{}] {} {}: {}", level, issue.kind, location, issue.message);
        }
    }

    out
}

fn sample_line(row: &ProcessedRow) -> String {
    format!(
        "| {:<8} | {:<30} | {:<12} | {:<16} | {:<5.2} | {:>9} | {:>13} |",
        truncate(&row.seq_no, 8),
        truncate(&row.title, 30),
        truncate(row.special_code.as_deref().unwrap_or("N/A"), 12),
        truncate(&row.task_id, 16),
        row.effective_coefficient(),
        hours_to_hhmm(row.base_hours),
        hours_to_hhmm(row.adjusted_hours),
    )
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
