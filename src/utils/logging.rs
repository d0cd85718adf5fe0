/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::workflow::SessionSummary;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 刷题程序启动");
    info!("📚 题库文件: {}", config.questions_file.display());
    info!("📒 错题本: {}", config.mistakes_file.display());
    info!(
        "⏱  每题限时: {} 秒 | 抽题策略: {}",
        config.time_limit_secs, config.draw_policy
    );
    info!("{}", "=".repeat(60));
}

/// 记录题库加载信息
///
/// # 参数
/// - `total`: 有效题目数量
/// - `phrases`: 鼓励话语数量
pub fn log_bank_loaded(total: usize, phrases: usize) {
    info!("✓ 题库中共有 {} 道有效题目", total);
    if phrases > 0 {
        info!("💡 已加载 {} 条鼓励话语", phrases);
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 会话统计
/// - `mistakes_path`: 错题本路径
pub fn print_final_stats(summary: &SessionSummary, mistakes_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次刷题统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 答对: {}/{}", summary.score, summary.total_answered);
    info!("🎯 正确率: {:.1}%", summary.accuracy());
    info!("{}", "=".repeat(60));
    info!("\n错题已保存至: {}", mistakes_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
