// ==========================================
// 工包工时核算系统 - 单文件处理器
// ==========================================
// 职责: 串联行规范化 → 系数应用 → 去重汇总 → 参考库核对，产出 ProcessingResult
// 数据流:
//   原始行 → SEQ 分类 / 任务号提取 → 规范化 → 系数 → ProcessedRow
//   ProcessedRow → 去重 → 汇总 / 高工时 / 新任务号 / 特殊代码
//   原始行（不去重）→ 工具控制
// 红线:
//   - 单行坏数据不抛错，记录 RowIssue 后按默认值继续
//   - 查找未命中必须可见（日志 + RowIssue），不可静默吞掉
//   - 查找表只读，不在处理过程中修改
// ==========================================

use crate::config::AppConfig;
use crate::domain::result::{
    AircraftIdentity, BonusContribution, ProcessedRow, ProcessingResult, RowCounts, RowIssue,
    SpecialCodeShare, ToolShortage,
};
use crate::domain::types::{IssueKind, IssueLevel};
use crate::domain::workpack::{AircraftInfo, Workpack, WorkpackPeriod};
use crate::engine::aggregator::{self, Aggregator};
use crate::engine::coefficient::{self, CoefficientApplier, CoefficientKey};
use crate::engine::id_extractor;
use crate::engine::lookup::LookupTables;
use crate::engine::normalizer::RowNormalizer;
use crate::engine::reference_checker::ReferenceChecker;
use crate::engine::special_code;
use crate::engine::tool_control::ToolControlChecker;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub struct WorkpackProcessor<'a> {
    config: &'a AppConfig,
    tables: &'a LookupTables,
}

impl<'a> WorkpackProcessor<'a> {
    pub fn new(config: &'a AppConfig, tables: &'a LookupTables) -> Self {
        Self { config, tables }
    }

    pub fn process(&self, workpack: &Workpack) -> ProcessingResult {
        let mut issues = Vec::new();

        let identity = self.resolve_identity(workpack, &mut issues);
        let period = self.resolve_period(workpack, &mut issues);

        // ===== 逐行计算 =====
        let (processed, skipped) = self.process_rows(workpack, &identity, &mut issues);
        let unique = aggregator::dedupe(&processed);

        // ===== 汇总 =====
        let (bonus_hours, bonus_breakdown) = self.lookup_bonus(&identity, &mut issues);
        let agg = Aggregator::new(self.config.mode, self.config.high_hours_threshold);
        let totals = agg.totals(&processed, &unique, bonus_hours);
        let days = period.map(|p| p.days);

        let coefficient_breakdown = if self.tables.coefficients.is_some() {
            coefficient::breakdown(agg.coefficient_rows(&processed, &unique))
        } else {
            Vec::new()
        };

        let special_codes = self.special_codes(workpack, &processed, &unique, totals.total_hours, days);

        // ===== 清单 =====
        let high_hour_rows = agg.high_hour_rows(&unique);
        let checker = ReferenceChecker::new(&self.tables.reference_ids, self.config.eo_prefix());
        let new_identifiers = checker.find_new(unique.iter().copied());
        let tool_shortages = self.tool_shortages(workpack);

        let row_counts = RowCounts {
            total: workpack.rows.len(),
            processed: processed.len(),
            unique: unique.len(),
            skipped,
        };
        let debug_sample = sample_evenly(&unique, self.config.sample_size);

        log_issue_summary(&workpack.source_name, &issues);
        info!(
            file = %workpack.source_name,
            total_rows = row_counts.total,
            unique_rows = row_counts.unique,
            skipped_rows = row_counts.skipped,
            base_hours = totals.base_hours,
            coefficient_delta = totals.coefficient_delta,
            bonus_hours = totals.bonus_hours,
            total_hours = totals.total_hours,
            new_ids = new_identifiers.len(),
            "工包计算完成"
        );

        ProcessingResult {
            source_name: workpack.source_name.clone(),
            identity,
            period,
            mode: self.config.mode,
            totals,
            average_per_day: aggregator::average_per_day(totals.total_hours, days),
            coefficient_breakdown,
            bonus_breakdown,
            special_codes,
            high_hours_threshold: self.config.high_hours_threshold,
            high_hour_rows,
            new_identifiers,
            tool_shortages,
            row_counts,
            debug_sample,
            issues,
        }
    }

    /// 首行机号信息
    fn resolve_identity(&self, workpack: &Workpack, issues: &mut Vec<RowIssue>) -> AircraftIdentity {
        let info = workpack
            .rows
            .first()
            .and_then(|row| row.aircraft_info.as_deref())
            .and_then(AircraftInfo::parse);

        let Some(info) = info else {
            warn!(file = %workpack.source_name, "首行缺少机号信息，无法确定机型与工包类型");
            issues.push(RowIssue::warning(
                None,
                None,
                IssueKind::UnresolvedAircraftType,
                "首行缺少机号信息".to_string(),
            ));
            return AircraftIdentity::default();
        };

        let aircraft_type = self.tables.aircraft_types.get(&info.registration).map(str::to_string);
        if aircraft_type.is_none() {
            warn!(registration = %info.registration, "注册号未找到机型，系数与奖励工时将无法匹配");
            issues.push(RowIssue::warning(
                None,
                None,
                IssueKind::UnresolvedAircraftType,
                format!("注册号 '{}' 未找到机型", info.registration),
            ));
        }

        let check_group = self.config.check_groups.resolve(&info.wp_type).map(str::to_string);
        debug!(
            registration = %info.registration,
            aircraft_type = ?aircraft_type,
            wp_type = %info.wp_type,
            check_group = ?check_group,
            "机号信息"
        );

        AircraftIdentity {
            registration: Some(info.registration),
            aircraft_type,
            wp_type: Some(info.wp_type),
            check_group,
        }
    }

    /// 首行起止日期 → 工包周期
    fn resolve_period(&self, workpack: &Workpack, issues: &mut Vec<RowIssue>) -> Option<WorkpackPeriod> {
        let first = workpack.rows.first()?;
        let (Some(start), Some(end)) = (first.start_date.as_deref(), first.end_date.as_deref()) else {
            debug!(file = %workpack.source_name, "未提供工包起止日期");
            return None;
        };

        match WorkpackPeriod::parse(start, end) {
            Some(period) if period.days >= 1 => Some(period),
            Some(period) => {
                warn!(start = %period.start, end = %period.end, "工包结束日期早于开始日期，日均工时不计算");
                issues.push(RowIssue::warning(
                    None,
                    None,
                    IssueKind::InvalidWorkpackPeriod,
                    format!("结束日期 {} 早于开始日期 {}", period.end, period.start),
                ));
                Some(period)
            }
            None => {
                warn!(start = %start, end = %end, "工包起止日期无法解析");
                issues.push(RowIssue::warning(
                    None,
                    None,
                    IssueKind::InvalidWorkpackPeriod,
                    format!("工包起止日期无法解析: '{}' / '{}'", start, end),
                ));
                None
            }
        }
    }

    /// 返回 (参与计算的行, 跳过行数)
    fn process_rows(
        &self,
        workpack: &Workpack,
        identity: &AircraftIdentity,
        issues: &mut Vec<RowIssue>,
    ) -> (Vec<ProcessedRow>, usize) {
        let normalizer = RowNormalizer::new(&self.config.check_groups, identity.wp_type.as_deref());
        let applier = CoefficientApplier::new(self.tables.coefficients.as_ref());
        let aircraft_code = identity.aircraft_type.as_deref();

        let mut processed = Vec::with_capacity(workpack.rows.len());
        let mut skipped = 0usize;

        for row in &workpack.rows {
            let decision = self.config.seq_rules.decide(&row.seq_no);
            if !decision.mapped {
                issues.push(RowIssue::info(
                    Some(row.row_number),
                    Some(&row.seq_no),
                    IssueKind::UnmappedSeqPrefix,
                    format!("SEQ 大类 '{}' 未配置，跳过", id_extractor::major_segment(&row.seq_no)),
                ));
            }
            if !decision.class.is_processed() {
                skipped += 1;
                continue;
            }

            let normalized = normalizer.normalize(row, issues);
            let key = CoefficientKey {
                check_group: normalized.check_group.as_deref(),
                aircraft_code,
                function_group: normalized.function_group.as_deref(),
            };
            let adjusted = applier.apply(normalized.base_hours, &key);

            if applier.is_enabled() && adjusted.coefficient.is_none() {
                if let Some(function_group) = key.function_group {
                    debug!(
                        row_number = row.row_number,
                        seq_no = %row.seq_no,
                        check_group = ?key.check_group,
                        aircraft_code = ?key.aircraft_code,
                        function_group = %function_group,
                        "类型系数未命中，按 1.0 计"
                    );
                    issues.push(RowIssue::warning(
                        Some(row.row_number),
                        Some(&row.seq_no),
                        IssueKind::CoefficientMiss,
                        format!(
                            "类型系数未命中 ({} / {} / {})，按 1.0 计",
                            key.check_group.unwrap_or("-"),
                            key.aircraft_code.unwrap_or("-"),
                            function_group
                        ),
                    ));
                }
            }

            processed.push(ProcessedRow {
                row_number: row.row_number,
                seq_no: row.seq_no.clone(),
                title: row.title.clone(),
                class: decision.class,
                task_id: id_extractor::extract(&row.title, decision.rule),
                base_hours: normalized.base_hours,
                check_group: normalized.check_group,
                function_group: normalized.function_group,
                special_code: row
                    .special_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string),
                coefficient: adjusted.coefficient,
                adjusted_hours: adjusted.hours,
            });
        }

        (processed, skipped)
    }

    /// 文件级奖励工时（只查一次）
    fn lookup_bonus(
        &self,
        identity: &AircraftIdentity,
        issues: &mut Vec<RowIssue>,
    ) -> (f64, Vec<BonusContribution>) {
        let Some(table) = self.tables.bonus.as_ref() else {
            return (0.0, Vec::new());
        };

        let (Some(wp_type), Some(aircraft_type)) =
            (identity.wp_type.as_deref(), identity.aircraft_type.as_deref())
        else {
            warn!("缺少工包类型或机型，奖励工时按 0 计");
            issues.push(RowIssue::warning(
                None,
                None,
                IssueKind::BonusMiss,
                "缺少工包类型或机型，奖励工时按 0 计".to_string(),
            ));
            return (0.0, Vec::new());
        };

        match table.get(wp_type, aircraft_type) {
            Some(entry) => {
                info!(wp_type = %wp_type, aircraft_type = %aircraft_type, bonus_hours = entry.total_hours, "奖励工时命中");
                (entry.total_hours, entry.sources.clone())
            }
            None => {
                warn!(wp_type = %wp_type, aircraft_type = %aircraft_type, "奖励工时未命中，按 0 计");
                issues.push(RowIssue::warning(
                    None,
                    None,
                    IssueKind::BonusMiss,
                    format!("奖励工时未命中 ({} / {})，按 0 计", wp_type, aircraft_type),
                ));
                (0.0, Vec::new())
            }
        }
    }

    fn special_codes(
        &self,
        workpack: &Workpack,
        processed: &[ProcessedRow],
        unique: &[&ProcessedRow],
        total_hours: f64,
        days: Option<i64>,
    ) -> Option<Vec<SpecialCodeShare>> {
        if !self.config.features.special_code {
            return None;
        }
        if !workpack.columns.special_code {
            warn!(file = %workpack.source_name, "特殊代码列不存在，跳过特殊代码分析");
            return None;
        }
        if !special_code::has_data(processed) {
            warn!(file = %workpack.source_name, "特殊代码列无数据，跳过特殊代码分析");
            return None;
        }
        Some(special_code::distribution(unique.iter().copied(), total_hours, days))
    }

    fn tool_shortages(&self, workpack: &Workpack) -> Option<Vec<ToolShortage>> {
        if !self.config.features.tool_control {
            return None;
        }
        if !workpack.columns.tool_control {
            warn!(file = %workpack.source_name, "工具控制列不完整，跳过工具控制检查");
            return None;
        }
        let checker = ToolControlChecker::new(&self.config.seq_rules, &self.tables.ignore_list);
        Some(checker.check(&workpack.rows))
    }
}

/// 等间隔抽样（确定性）
pub fn sample_evenly(rows: &[&ProcessedRow], size: usize) -> Vec<ProcessedRow> {
    let total = rows.len();
    let take = size.min(total);
    (0..take).map(|i| rows[i * total / take].clone()).collect()
}

/// 问题汇总：按类别计数输出，明细输出 debug
fn log_issue_summary(file: &str, issues: &[RowIssue]) {
    let mut counts: HashMap<IssueKind, (IssueLevel, usize)> = HashMap::new();
    for issue in issues {
        counts.entry(issue.kind).or_insert((issue.level, 0)).1 += 1;
        debug!(
            file = %file,
            row_number = ?issue.row_number,
            seq_no = ?issue.seq_no,
            kind = %issue.kind,
            "{}",
            issue.message
        );
    }

    for (kind, (level, count)) in counts {
        match level {
            IssueLevel::Warning => warn!(file = %file, kind = %kind, count, "行级问题，已按默认值继续"),
            IssueLevel::Info => info!(file = %file, kind = %kind, count, "行级提示"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeqClass;

    fn row(n: usize) -> ProcessedRow {
        ProcessedRow {
            row_number: n,
            seq_no: format!("2.{}", n),
            title: String::new(),
            class: SeqClass::CheckAgainstReference,
            task_id: String::new(),
            base_hours: 1.0,
            check_group: None,
            function_group: None,
            special_code: None,
            coefficient: None,
            adjusted_hours: 1.0,
        }
    }

    #[test]
    fn test_sample_evenly_spaced() {
        let rows: Vec<ProcessedRow> = (0..10).map(row).collect();
        let refs: Vec<&ProcessedRow> = rows.iter().collect();

        let sample = sample_evenly(&refs, 5);
        let numbers: Vec<usize> = sample.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![0, 2, 4, 6, 8]);

        // 再次抽样结果一致
        let again: Vec<usize> = sample_evenly(&refs, 5).iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, again);
    }

    #[test]
    fn test_sample_evenly_small_input() {
        let rows: Vec<ProcessedRow> = (0..3).map(row).collect();
        let refs: Vec<&ProcessedRow> = rows.iter().collect();

        assert_eq!(sample_evenly(&refs, 5).len(), 3);
        assert!(sample_evenly(&refs, 0).is_empty());
        assert!(sample_evenly(&[], 5).is_empty());
    }
}
