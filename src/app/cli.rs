// ==========================================
// 工包工时核算系统 - 命令行定义
// ==========================================
// 子命令:
//   run (默认)      处理输入目录下全部工包文件
//   check-config    加载并校验配置、构建查找表、打印配置快照
// ==========================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "workpack-mhrs",
    version,
    about = "飞机维修工包工时核算: 工时汇总 / 新任务号核对 / 工具航材短缺检查"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// settings.toml 路径（默认: ./settings.toml → 用户配置目录）
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// 日志级别过滤器（RUST_LOG 优先）
    #[arg(long, global = true, value_name = "FILTER", default_value = crate::logging::DEFAULT_LEVEL)]
    pub log_level: String,

    /// 以 JSON 行格式输出日志
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 处理全部工包文件（默认）
    Run,
    /// 校验配置与参考数据，不处理工包
    CheckConfig,
}

impl Cli {
    /// 未指定子命令时按 run 处理
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
