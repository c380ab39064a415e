// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时工作目录（INPUT / OUTPUT / REFERENCE / LOG）、
//       CSV 参考数据、settings.toml 生成
// ==========================================

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use workpack_mhrs::config::{AppConfig, ConfigManager};

pub const WORKPACK_HEADER: &str =
    "Seq. No.,Title,Planned Mhrs,Aircraft,Func,Special Code,Start_date,End_date";
pub const TOOL_HEADER: &str = "Tool Name,Tool Type,Part No,Qty,Alt Qty";

/// 功能开关
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    pub special_code: bool,
    pub tool_control: bool,
    pub type_coefficient: bool,
    pub bonus_hours: bool,
    pub per_row: bool,
    pub stop_on_file_error: bool,
}

/// 临时工作目录（TempDir 需保持存活）
pub struct TestWorkspace {
    pub dir: TempDir,
}

impl TestWorkspace {
    /// 创建目录结构并写入默认参考数据
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["INPUT", "OUTPUT", "REFERENCE", "LOG"] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
        }

        let ws = Self { dir };
        ws.write_reference("reference.csv", "Task ID,EO ID\n24-045-00,EO-2024-001\n24-050-00,\n");
        ws.write_reference("fleet.csv", "Registration,Type\n9MMXA,A320\n9MMXB,A330\n");
        ws.write_reference(
            "type_coefficient.csv",
            "Aircraft,Check,Function,Coefficient,Active\n\
             A320,A-CHECK,ENG,1.5,TRUE\n\
             A320,A-CHECK,CAB,2.0,FALSE\n",
        );
        ws.write_reference(
            "bonus_hours.csv",
            "WP Type,AC Type,Bonus,Extra,Active\n\
             A06,A320,1.5,0.5,TRUE\n\
             A06,A330,9.0,0,TRUE\n",
        );
        ws.write_reference("ignore_item.txt", "# 常备工具\nSTEP LADDER\n");
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn input(&self) -> PathBuf {
        self.root().join("INPUT")
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("OUTPUT")
    }

    pub fn reference(&self) -> PathBuf {
        self.root().join("REFERENCE")
    }

    pub fn log(&self) -> PathBuf {
        self.root().join("LOG")
    }

    pub fn write_reference(&self, name: &str, content: &str) -> PathBuf {
        let path = self.reference().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// 写入工包 CSV（rows 为不含表头的数据行）
    pub fn write_workpack(&self, name: &str, header: &str, rows: &[&str]) -> PathBuf {
        let mut content = String::from(header);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        let path = self.input().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// 生成 settings.toml 并返回路径
    pub fn write_settings(&self, features: Features) -> PathBuf {
        let path = self.root().join("settings.toml");
        fs::write(&path, self.settings_toml(features)).unwrap();
        path
    }

    pub fn config(&self, features: Features) -> AppConfig {
        let path = self.write_settings(features);
        ConfigManager::from_path(&path).unwrap().into_config()
    }

    pub fn settings_toml(&self, f: Features) -> String {
        format!(
            r#"
[paths]
input_folder = '{input}'
output_folder = '{output}'
reference_folder = '{reference}'
reference_file = "reference.csv"
log_folder = '{log}'

[processing]
enable_special_code = {special_code}
enable_tool_control = {tool_control}
enable_type_coefficient = {type_coefficient}
enable_bonus_hours = {bonus_hours}
type_coefficient_per_seq = {per_seq}
stop_on_file_error = {stop}

[reference_sheet]
task_sheet_name = "Task"
task_id_column = "Task ID"
eo_sheet_name = "EO"
eo_id_column = "EO ID"
eo_prefix = "EO-"

[uploaded_sheet]
seq_no = "Seq. No."
title = "Title"
planned_mhrs = "Planned Mhrs"
aircraft_info = "Aircraft"
special_code = "Special Code"
function_group = "Func"

[aircraft_type]
file = "fleet.csv"
sheet = "Fleet"
registration_column = "Registration"
type_column = "Type"

[type_coefficient]
file = "type_coefficient.csv"
aircraft_column = "Aircraft"
check_group_column = "Check"
function_column = "Function"
coefficient_column = "Coefficient"
active_column = "Active"

[bonus_hours]
file = "bonus_hours.csv"
wp_type_column = "WP Type"
aircraft_type_column = "AC Type"
bonus_columns = ["Bonus", "Extra"]
active_column = "Active"

[tool_control]
tool_name = "Tool Name"
tool_type = "Tool Type"
tool_partno = "Part No"
total_qty = "Qty"
alt_qty = "Alt Qty"

[thresholds]
high_mhrs_hours = 2.5
random_sample_size = 5

[check_groups]
A = "A-CHECK"
C = "C-CHECK"

[seq_mappings]
"2" = "true"
"3" = "false"
"9" = "ignore"

[seq_id_mappings]
"2" = "-"
"3" = "/"
"#,
            input = self.input().display(),
            output = self.output().display(),
            reference = self.reference().display(),
            log = self.log().display(),
            special_code = f.special_code,
            tool_control = f.tool_control,
            type_coefficient = f.type_coefficient,
            bonus_hours = f.bonus_hours,
            per_seq = !f.per_row,
            stop = f.stop_on_file_error,
        )
    }
}

/// 示例工包: 2.1 重复 / 2.2 为新任务号
pub fn scenario_rows() -> Vec<&'static str> {
    vec![
        "2.1,24-045-00 (00) - A,120,9MMXA-ENG-A06,ENG,STR,2025-03-01,2025-03-04",
        "2.1,duplicate,60,9MMXA-ENG-A06,ENG,STR,,",
        "2.2,24-099-00 (00) - B,180,9MMXA-ENG-A06,,,,",
    ]
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// 找到某输入文件的唯一一次输出目录
pub fn report_folder(ws: &TestWorkspace, stem: &str) -> PathBuf {
    let parent = ws.output().join(stem);
    let mut entries: Vec<PathBuf> = fs::read_dir(&parent)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1, "expected a single report folder in {}", parent.display());
    entries.remove(0)
}
