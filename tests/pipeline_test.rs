// ==========================================
// 工时计算流水线集成测试
// ==========================================
// 测试目标: CSV 工包 + CSV 参考数据 → 导入 → 计算 → ProcessingResult
// ==========================================

mod test_helpers;

use test_helpers::{assert_close, scenario_rows, Features, TestWorkspace, TOOL_HEADER, WORKPACK_HEADER};
use workpack_mhrs::domain::{IssueKind, ProcessingResult, ToolKind};
use workpack_mhrs::engine::WorkpackProcessor;
use workpack_mhrs::importer::{ReferenceLoader, WorkpackImporter};
use workpack_mhrs::logging;

fn process(ws: &TestWorkspace, features: Features, header: &str, rows: &[&str]) -> ProcessingResult {
    logging::init_test();
    let config = ws.config(features);
    let tables = ReferenceLoader::new(&config).build_lookup_tables().unwrap();
    let path = ws.write_workpack("WP_9MMXA.csv", header, rows);

    let workpack = WorkpackImporter::new(&config).import(&path).unwrap();
    WorkpackProcessor::new(&config, &tables).process(&workpack)
}

fn has_issue(result: &ProcessingResult, kind: IssueKind) -> bool {
    result.issues.iter().any(|i| i.kind == kind)
}

// ==========================================
// 端到端示例
// ==========================================

#[test]
fn test_scenario_base_hours_and_new_identifier() {
    let ws = TestWorkspace::new();
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &scenario_rows());

    // 去重保留首个 2.1（2.0h）+ 2.2（3.0h）
    assert_close(result.totals.base_hours, 5.0);
    assert_close(result.totals.coefficient_delta, 0.0);
    assert_close(result.totals.bonus_hours, 0.0);
    assert_close(result.totals.total_hours, 5.0);

    assert_eq!(result.new_identifiers.len(), 1);
    assert_eq!(result.new_identifiers[0].seq_no, "2.2");
    assert_eq!(result.new_identifiers[0].task_id, "24-099-00");
    assert!(!result.new_identifiers[0].is_eo);

    assert_eq!(result.row_counts.total, 3);
    assert_eq!(result.row_counts.unique, 2);
    assert_eq!(result.identity.registration.as_deref(), Some("9MMXA"));
    assert_eq!(result.identity.aircraft_type.as_deref(), Some("A320"));
    assert_eq!(result.identity.check_group.as_deref(), Some("A-CHECK"));

    // 功能关闭 → 可选分析不产出
    assert!(result.special_codes.is_none());
    assert!(result.tool_shortages.is_none());
    assert!(result.coefficient_breakdown.is_empty());
}

#[test]
fn test_average_per_day_from_period() {
    let ws = TestWorkspace::new();
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &scenario_rows());

    let period = result.period.unwrap();
    assert_eq!(period.days, 4);
    assert_close(result.average_per_day.unwrap(), 1.25);
}

#[test]
fn test_zero_day_period_reports_no_average() {
    let ws = TestWorkspace::new();
    let rows = ["2.1,24-045-00 (00) - A,120,9MMXA-ENG-A06,ENG,,2025-03-04,2025-03-03"];
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &rows);

    assert_eq!(result.period.unwrap().days, 0);
    assert!(result.average_per_day.is_none());
    assert!(has_issue(&result, IssueKind::InvalidWorkpackPeriod));
    assert_close(result.totals.total_hours, 2.0);
}

// ==========================================
// 类型系数模式
// ==========================================

#[test]
fn test_per_unique_key_mode_counts_coefficient_once() {
    let ws = TestWorkspace::new();
    let features = Features {
        type_coefficient: true,
        ..Default::default()
    };
    let result = process(&ws, features, WORKPACK_HEADER, &scenario_rows());

    // 首个 2.1: 2.0h × 1.5 → +1.0h；重复行不计
    assert_close(result.totals.base_hours, 5.0);
    assert_close(result.totals.coefficient_delta, 1.0);
    assert_close(result.totals.total_hours, 6.0);

    assert_eq!(result.coefficient_breakdown.len(), 1);
    let eng = &result.coefficient_breakdown[0];
    assert_eq!(eng.function_group, "ENG");
    assert_eq!(eng.row_count, 1);
    assert_close(eng.additional_hours, 1.0);
}

#[test]
fn test_per_row_mode_counts_every_physical_row() {
    let ws = TestWorkspace::new();
    let features = Features {
        type_coefficient: true,
        per_row: true,
        ..Default::default()
    };
    let result = process(&ws, features, WORKPACK_HEADER, &scenario_rows());

    // 2.0h × 0.5 + 1.0h × 0.5 = 1.5h；基础工时仍按去重计
    assert_close(result.totals.base_hours, 5.0);
    assert_close(result.totals.coefficient_delta, 1.5);
    assert_close(result.totals.total_hours, 6.5);
    assert_eq!(result.coefficient_breakdown[0].row_count, 2);
}

#[test]
fn test_inactive_coefficient_is_a_miss() {
    let ws = TestWorkspace::new();
    let features = Features {
        type_coefficient: true,
        ..Default::default()
    };
    let rows = ["2.1,24-045-00 (00) - A,120,9MMXA-ENG-A06,CAB,,,"];
    let result = process(&ws, features, WORKPACK_HEADER, &rows);

    // CAB 系数行未启用 → 按 1.0
    assert_close(result.totals.coefficient_delta, 0.0);
    assert_close(result.debug_sample[0].adjusted_hours, result.debug_sample[0].base_hours);
    assert!(result.debug_sample[0].coefficient.is_none());
    assert!(has_issue(&result, IssueKind::CoefficientMiss));
}

// ==========================================
// 奖励工时
// ==========================================

#[test]
fn test_bonus_added_once_per_file() {
    let ws = TestWorkspace::new();
    let features = Features {
        bonus_hours: true,
        ..Default::default()
    };

    let small = process(&ws, features, WORKPACK_HEADER, &scenario_rows());
    assert_close(small.totals.bonus_hours, 2.0);
    assert_close(small.totals.total_hours, 7.0);
    assert_eq!(small.bonus_breakdown.len(), 1);
    assert_eq!(small.bonus_breakdown[0].source, "bonus_hours");

    let mut rows = scenario_rows();
    rows.extend([
        "2.3,24-050-00 (00) - C,60,9MMXA-ENG-A06,,,,",
        "2.4,24-051-00 (00) - D,60,9MMXA-ENG-A06,,,,",
    ]);
    let large = process(&ws, features, WORKPACK_HEADER, &rows);
    assert_close(large.totals.bonus_hours, 2.0);
    assert_close(large.totals.total_hours, 9.0);
}

#[test]
fn test_bonus_miss_defaults_to_zero() {
    let ws = TestWorkspace::new();
    let features = Features {
        bonus_hours: true,
        ..Default::default()
    };
    let rows = ["2.1,24-045-00 (00) - A,120,9MMXA-ENG-C01,,,,"];
    let result = process(&ws, features, WORKPACK_HEADER, &rows);

    assert_close(result.totals.bonus_hours, 0.0);
    assert!(result.bonus_breakdown.is_empty());
    assert!(has_issue(&result, IssueKind::BonusMiss));
}

// ==========================================
// 行级容错 / SEQ 分类
// ==========================================

#[test]
fn test_malformed_duration_counts_as_zero() {
    let ws = TestWorkspace::new();
    let rows = [
        "2.1,24-045-00 (00) - A,N/A,9MMXA-ENG-A06,,,,",
        "2.2,24-050-00 (00) - B,90,9MMXA-ENG-A06,,,,",
    ];
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &rows);

    assert_close(result.totals.base_hours, 1.5);
    assert!(has_issue(&result, IssueKind::MalformedDuration));
}

#[test]
fn test_unmapped_and_ignored_segments_are_skipped() {
    let ws = TestWorkspace::new();
    let rows = [
        "2.1,24-045-00 (00) - A,120,9MMXA-ENG-A06,,,,",
        "5.1,99-999-99 (00) - NOISE,600,9MMXA-ENG-A06,,,,",
        "9.1,88-888-88 (00) - IGNORED,600,9MMXA-ENG-A06,,,,",
        "3.1,77-777-77 / PROCESS ONLY,60,9MMXA-ENG-A06,,,,",
    ];
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &rows);

    // 5.x 未配置、9.x 为 ignore → 不计入；3.x 只计工时不核对
    assert_close(result.totals.base_hours, 3.0);
    assert_eq!(result.row_counts.skipped, 2);
    assert!(result.new_identifiers.is_empty());
    assert!(has_issue(&result, IssueKind::UnmappedSeqPrefix));
}

#[test]
fn test_eo_identifiers_checked_against_eo_set() {
    let ws = TestWorkspace::new();
    let rows = [
        "2.1,EO-2024-001 (R1) CABIN,60,9MMXA-ENG-A06,,,,",
        "2.2,EO-2024-777 (R1) CARGO,60,9MMXA-ENG-A06,,,,",
    ];
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &rows);

    assert_eq!(result.new_identifiers.len(), 1);
    assert_eq!(result.new_identifiers[0].task_id, "EO-2024-777");
    assert!(result.new_identifiers[0].is_eo);
}

#[test]
fn test_high_hour_rows_sorted_desc() {
    let ws = TestWorkspace::new();
    let rows = [
        "2.1,24-045-00 (00) - A,180,9MMXA-ENG-A06,,,,",
        "2.2,24-046-00 (00) - B,300,9MMXA-ENG-A06,,,,",
        "2.3,24-047-00 (00) - C,60,9MMXA-ENG-A06,,,,",
        "2.4,24-048-00 (00) - D,180,9MMXA-ENG-A06,,,,",
    ];
    let result = process(&ws, Features::default(), WORKPACK_HEADER, &rows);

    let seqs: Vec<_> = result.high_hour_rows.iter().map(|r| r.seq_no.as_str()).collect();
    assert_eq!(seqs, vec!["2.2", "2.1", "2.4"]);
}

// ==========================================
// 特殊代码 / 工具控制
// ==========================================

#[test]
fn test_special_code_distribution() {
    let ws = TestWorkspace::new();
    let features = Features {
        special_code: true,
        ..Default::default()
    };
    let result = process(&ws, features, WORKPACK_HEADER, &scenario_rows());

    let shares = result.special_codes.unwrap();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares[0].code, None);
    assert_close(shares[0].hours, 3.0);
    assert_close(shares[0].percentage, 60.0);
    assert_eq!(shares[1].code.as_deref(), Some("STR"));
    assert_close(shares[1].hours_per_day.unwrap(), 0.5);
}

#[test]
fn test_tool_control_checks_every_row() {
    let ws = TestWorkspace::new();
    let features = Features {
        tool_control: true,
        ..Default::default()
    };
    let header = format!("{},{}", WORKPACK_HEADER, TOOL_HEADER);
    let rows = [
        "2.1,24-045-00 (00) - A,60,9MMXA-ENG-A06,,,,,JACK,Y,P-100,0,0",
        "2.1,24-045-00 (00) - A,60,9MMXA-ENG-A06,,,,,SEAL,N,P-200,0,",
        "2.2,24-046-00 (00) - B,60,9MMXA-ENG-A06,,,,,STEP LADDER,Y,P-300,0,0",
        "2.3,24-047-00 (00) - C,60,9MMXA-ENG-A06,,,,,TORQUE WRENCH,Y,P-400,2,0",
    ];
    let result = process(&ws, features, &header, &rows);

    // 重复 SEQ 的行同样检查；忽略清单与有库存的行不报
    let shortages = result.tool_shortages.unwrap();
    assert_eq!(shortages.len(), 2);
    assert_eq!(shortages[0].part_number, "P-100");
    assert_eq!(shortages[0].kind, ToolKind::Tool);
    assert_eq!(shortages[0].task_id, "24-045-00");
    assert_eq!(shortages[1].part_number, "P-200");
    assert_eq!(shortages[1].kind, ToolKind::Spare);
}
