use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 日志输出到 stderr，避免与终端上的题目混在一起。
/// 设置了 `RUST_LOG` 时以其为准，否则按 `verbose` 选择 debug 或 info 级别。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
