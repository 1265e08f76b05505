/// 日志工具模块
///
/// 负责初始化 tracing 订阅器，并提供启动/统计类日志的格式化输出
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 重复调用是安全的：第二次初始化会被忽略
pub fn init(config: &Config) {
    let filter = if config.verbose_logging {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Academia 管理端启动");
    info!("🌐 API 地址: {}", config.api_base_url);
    info!("⏱️ 请求超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录基础数据加载结果
pub fn log_catalogs_loaded(areas: usize, cycles: usize, admissions: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📚 基础数据加载完成");
    info!("  区域: {}", areas);
    info!("  周期: {}", cycles);
    info!("  招生批次: {}", admissions);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("Peña", 10), "Peña");
        assert_eq!(truncate_text("Matrícula", 4), "Matr...");
    }
}
