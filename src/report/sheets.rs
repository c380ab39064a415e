// ==========================================
// 工包工时核算系统 - 报表工作表布局
// ==========================================
// 职责: ProcessingResult → 按行组织的字符串表格（每张表一个 CSV）
// 规则:
//   - 工时同时给出 HH:MM 与两位小数
//   - 空表只写一行说明文字，不写表头
//   - 功能关闭的表（特殊代码 / 工具控制）不生成
// ==========================================

use crate::domain::result::ProcessingResult;
use crate::engine::tool_control;
use crate::report::format::{self, decimal, hours_to_hhmm, or_na, percentage};

pub const NO_CODE_LABEL: &str = "(No Code)";

/// 单张报表
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str, // 输出文件名（不含扩展名）
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: Vec::new(),
        }
    }

    fn message(name: &'static str, text: &str) -> Self {
        let mut sheet = Self::new(name);
        sheet.push([text]);
        sheet
    }

    fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn blank(&mut self) {
        self.rows.push(Vec::new());
    }

    fn hours_line(&mut self, label: &str, hours: f64) {
        self.push([label.to_string(), hours_to_hhmm(hours), decimal(hours)]);
    }
}

/// 生成单个文件的全部报表
pub fn build_all(result: &ProcessingResult) -> Vec<Sheet> {
    let mut sheets = vec![total_man_hours(result)];
    sheets.extend(special_code_distribution(result));
    sheets.push(high_man_hours(result));
    sheets.push(new_task_ids(result));
    sheets.push(bonus_hours(result));
    sheets.extend(tool_control(result));
    sheets
}

// ==========================================
// 总工时
// ==========================================
pub fn total_man_hours(result: &ProcessingResult) -> Sheet {
    let mut sheet = Sheet::new("total_man_hours");
    let identity = &result.identity;
    let totals = &result.totals;

    sheet.push(["PROJECT INFORMATION"]);
    sheet.push([
        "Workpack Period:".to_string(),
        format::period_range(result.period.as_ref()),
        result
            .period
            .filter(|p| p.days >= 1)
            .map(|p| format!("{} days", p.days))
            .unwrap_or_else(|| format::NOT_AVAILABLE.to_string()),
    ]);
    sheet.push(["Aircraft Registration:".to_string(), or_na(identity.registration.as_deref())]);
    sheet.push(["Aircraft Type:".to_string(), or_na(identity.aircraft_type.as_deref())]);
    sheet.push(["Check Type (WP Type):".to_string(), or_na(identity.wp_type.as_deref())]);
    sheet.push(["Coefficient Mode:".to_string(), result.mode.to_string()]);
    sheet.blank();

    sheet.push(["MAN-HOURS CALCULATION"]);
    sheet.hours_line("Base Man-Hours:", totals.base_hours);
    sheet.blank();

    sheet.push(["ADDITIONAL HOURS BREAKDOWN", "HH:MM", "Hours"]);
    if !result.bonus_breakdown.is_empty() {
        sheet.push(["Bonus Hours:"]);
        for contribution in &result.bonus_breakdown {
            sheet.hours_line(&format!("  • {}", contribution.source), contribution.hours);
        }
        sheet.blank();
    }
    if !result.coefficient_breakdown.is_empty() {
        sheet.push(["Type Coefficient Adjustments:"]);
        for group in &result.coefficient_breakdown {
            let label = format!(
                "  • {} (Coeff: {:.2}, {} tasks)",
                group.function_group, group.coefficient, group.row_count
            );
            sheet.hours_line(&label, group.additional_hours);
        }
        sheet.blank();
    }
    sheet.hours_line("Total Additional Hours:", totals.additional_hours());
    sheet.blank();

    sheet.push(["FINAL TOTAL"]);
    sheet.hours_line("Total Man-Hours:", totals.total_hours);
    if let Some(average) = result.average_per_day {
        sheet.hours_line("Average Man-Hours per Day:", average);
    }

    sheet
}

// ==========================================
// 特殊代码分布
// ==========================================
pub fn special_code_distribution(result: &ProcessingResult) -> Option<Sheet> {
    let shares = result.special_codes.as_ref()?;
    let mut sheet = Sheet::new("special_code_distribution");
    let per_day = result.average_per_day.is_some();

    let mut header = vec!["Special Code", "Hours (HH:MM)", "Hours (Decimal)"];
    if per_day {
        header.extend(["Avg Hours/Day (HH:MM)", "Avg Hours/Day (Decimal)"]);
    }
    header.push("Distribution (%)");
    sheet.push(header);

    for share in shares {
        let mut row = vec![
            share.code.clone().unwrap_or_else(|| NO_CODE_LABEL.to_string()),
            hours_to_hhmm(share.hours),
            decimal(share.hours),
        ];
        if per_day {
            let average = share.hours_per_day.unwrap_or(0.0);
            row.extend([hours_to_hhmm(average), decimal(average)]);
        }
        row.push(percentage(share.percentage));
        sheet.push(row);
    }

    let total = result.totals.total_hours;
    let mut row = vec!["TOTAL".to_string(), hours_to_hhmm(total), decimal(total)];
    if let Some(average) = result.average_per_day {
        row.extend([hours_to_hhmm(average), decimal(average)]);
    }
    row.push(percentage(100.0));
    sheet.push(row);

    Some(sheet)
}

// ==========================================
// 高工时任务
// ==========================================
pub fn high_man_hours(result: &ProcessingResult) -> Sheet {
    const NAME: &str = "high_man_hours";
    if result.high_hour_rows.is_empty() {
        return Sheet::message(
            NAME,
            &format!(
                "No tasks found with man-hours exceeding the threshold ({} h)",
                decimal(result.high_hours_threshold)
            ),
        );
    }

    let mut sheet = Sheet::new(NAME);
    sheet.push(["SEQ", "Title", "Task ID", "Base Mhrs", "Base Hours", "Adjusted Hours"]);
    for row in &result.high_hour_rows {
        sheet.push([
            row.seq_no.clone(),
            row.title.clone(),
            row.task_id.clone(),
            hours_to_hhmm(row.base_hours),
            decimal(row.base_hours),
            decimal(row.adjusted_hours),
        ]);
    }
    sheet
}

// ==========================================
// 新任务号
// ==========================================
pub fn new_task_ids(result: &ProcessingResult) -> Sheet {
    const NAME: &str = "new_task_ids";
    if result.new_identifiers.is_empty() {
        return Sheet::message(NAME, "No new task IDs found - all task IDs match reference");
    }

    let mut sheet = Sheet::new(NAME);
    sheet.push(["SEQ", "New Task ID", "Reference"]);
    for id in &result.new_identifiers {
        sheet.push([
            id.seq_no.as_str(),
            id.task_id.as_str(),
            if id.is_eo { "EO" } else { "Task" },
        ]);
    }
    sheet
}

// ==========================================
// 奖励工时
// ==========================================
pub fn bonus_hours(result: &ProcessingResult) -> Sheet {
    const NAME: &str = "bonus_hours";
    if result.bonus_breakdown.is_empty() {
        return Sheet::message(NAME, "No bonus hours applied for this workpack");
    }

    let mut sheet = Sheet::new(NAME);
    sheet.push(["Bonus From", "Bonus Mhr", "Hours"]);
    for contribution in &result.bonus_breakdown {
        sheet.hours_line(&contribution.source, contribution.hours);
    }
    sheet.hours_line("Total", result.totals.bonus_hours);
    sheet
}

// ==========================================
// 工具控制
// ==========================================
pub fn tool_control(result: &ProcessingResult) -> Option<Sheet> {
    const NAME: &str = "tool_control";
    let shortages = result.tool_shortages.as_ref()?;
    if shortages.is_empty() {
        return Some(Sheet::message(
            NAME,
            "All tools and spares have adequate availability (quantity > 0)",
        ));
    }

    let mut sheet = Sheet::new(NAME);
    sheet.push(["SEQ", "Task ID", "Part No", "Tool Name", "Type"]);
    for shortage in shortages {
        sheet.push([
            shortage.seq_no.clone(),
            shortage.task_id.clone(),
            shortage.part_number.clone(),
            shortage.name.clone(),
            shortage.kind.to_string(),
        ]);
    }

    let summary = tool_control::summarize(shortages);
    sheet.blank();
    sheet.push(["SUMMARY"]);
    sheet.push(["Total Issues".to_string(), summary.total_issues.to_string()]);
    sheet.push(["Tools".to_string(), summary.tools.to_string()]);
    sheet.push(["Spares".to_string(), summary.spares.to_string()]);
    sheet.push(["Unique Parts".to_string(), summary.unique_parts.to_string()]);
    sheet.push(["Affected SEQs".to_string(), summary.affected_seqs.to_string()]);

    Some(sheet)
}
