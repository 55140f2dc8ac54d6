//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use log::LevelFilter;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
        }
    }
}

/// 初始化日志系统
///
/// 进程内只生效一次，重复调用返回成功
///
/// # 参数
/// * `config` - 日志配置
///
/// # 返回
/// * `Result<(), anyhow::Error>` - 初始化结果
pub fn setup_logging(config: &LogConfig) -> anyhow::Result<()> {
    // 初始化 LogTracer（log crate 到 tracing 的桥接）
    init_log_tracer()?;

    // 创建环境过滤器
    let env_filter = EnvFilter::from_default_env().add_directive(convert_level(config.level));

    // 创建格式化层
    let fmt_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_ansi(true)
            .boxed()
    };

    match registry().with(env_filter).with(fmt_layer).try_init() {
        Ok(()) => {
            tracing::debug!("日志系统初始化完成");
            Ok(())
        }
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("a global default trace dispatcher has already been set") {
                // 已经初始化过了
                tracing::debug!("日志系统已经初始化过了");
                Ok(())
            } else {
                Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", error_msg))
            }
        }
    }
}

/// 初始化 LogTracer
fn init_log_tracer() -> anyhow::Result<()> {
    use tracing_log::LogTracer;

    static LOG_TRACER_INIT: OnceLock<Result<(), String>> = OnceLock::new();

    let result = LOG_TRACER_INIT.get_or_init(|| LogTracer::init().map_err(|e| e.to_string()));

    result
        .as_ref()
        .map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;
    Ok(())
}

/// 将 log::LevelFilter 转换为 tracing 的指令
fn convert_level(level: LevelFilter) -> tracing_subscriber::filter::Directive {
    use tracing_subscriber::filter::Directive;
    match level {
        LevelFilter::Off => "off".parse().expect("合法的过滤指令"),
        LevelFilter::Error => Directive::from(tracing::Level::ERROR),
        LevelFilter::Warn => Directive::from(tracing::Level::WARN),
        LevelFilter::Info => Directive::from(tracing::Level::INFO),
        LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
        LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
    }
}
