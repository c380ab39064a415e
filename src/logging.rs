// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 优先级: RUST_LOG 环境变量 > 命令行 --log-level > 默认 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LEVEL: &str = "info";

/// 初始化日志系统
///
/// # 参数
/// - level: 未设置 RUST_LOG 时使用的过滤器（例如 "debug" 或 "workpack_mhrs=trace"）
/// - json: 输出 JSON 行格式（便于日志采集）
///
/// # 示例
/// ```no_run
/// use workpack_mhrs::logging;
/// logging::init("info", false);
/// ```
pub fn init(level: &str, json: bool) {
    let filter = build_filter(level);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // 重复初始化（如测试内多次调用）忽略
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
