// ==========================================
// 工包工时核算系统 - 命令行入口
// ==========================================
// 退出码: 0 = 全部文件成功 / 1 = 配置错误或存在失败文件
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use workpack_mhrs::app::{Cli, Command, Runner};
use workpack_mhrs::config::ConfigManager;
use workpack_mhrs::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.global.log_level, cli.global.log_json);

    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = ?e, "运行终止");
            eprintln!("错误: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<bool> {
    tracing::info!("==================================================");
    tracing::info!("{} v{}", workpack_mhrs::APP_NAME, workpack_mhrs::VERSION);
    tracing::info!("==================================================");

    let manager = ConfigManager::load(cli.global.settings.as_deref()).context("配置加载失败")?;
    manager.log_summary();

    match cli.command() {
        Command::CheckConfig => {
            let runner = Runner::new(manager.config()).context("参考数据加载失败")?;
            let tables = runner.tables();
            println!("配置文件: {}", manager.settings_path().display());
            println!("{}", manager.snapshot_json()?);
            println!(
                "查找表: 机型 {} / 类型系数 {} / 奖励工时 {} / 任务号 {} / EO 号 {} / 忽略项 {}",
                tables.aircraft_types.len(),
                tables.coefficients.as_ref().map_or(0, |t| t.len()),
                tables.bonus.as_ref().map_or(0, |t| t.len()),
                tables.reference_ids.task_ids.len(),
                tables.reference_ids.eo_ids.len(),
                tables.ignore_list.len(),
            );
            Ok(true)
        }
        Command::Run => {
            let runner = Runner::new(manager.config()).context("参考数据加载失败")?;
            let summary = runner.run()?;
            println!(
                "运行 {}: 成功 {} / 失败 {} / 跳过 {}",
                summary.run_id,
                summary.succeeded(),
                summary.failed(),
                summary.skipped()
            );
            Ok(summary.is_success())
        }
    }
}
