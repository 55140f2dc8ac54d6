//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Chain Vitals - 区块链RPC端点健康监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chain-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        help = "配置文件路径",
        env = "CHAIN_VITALS_CONFIG"
    )]
    pub config: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "CHAIN_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否使用JSON格式输出日志
    #[arg(long, help = "使用JSON格式输出日志")]
    pub log_json: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动健康监控服务
    Start {
        /// 探测间隔（分钟），覆盖配置文件中的值
        #[arg(
            short,
            long,
            value_name = "MINUTES",
            help = "探测间隔（分钟）",
            env = "CHAIN_VITALS_INTERVAL"
        )]
        interval: Option<u64>,
    },

    /// 执行一次性探测周期并输出结果
    Check {
        /// 端点名称（可选，不指定则探测所有端点）
        #[arg(value_name = "ENDPOINT", help = "端点名称")]
        endpoint: Option<String>,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 验证配置文件
    Validate {
        /// 是否显示详细信息
        #[arg(short, long, help = "显示详细信息")]
        verbose: bool,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
    }

    #[test]
    fn test_args_parsing_start() {
        let args = Args::try_parse_from([
            "chain-vitals",
            "--config",
            "test.yaml",
            "start",
            "--interval",
            "5",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("test.yaml"));
        assert!(matches!(
            args.command,
            Commands::Start {
                interval: Some(5)
            }
        ));
    }

    #[test]
    fn test_args_parsing_check() {
        let args = Args::try_parse_from(["chain-vitals", "check", "mainnet"]).unwrap();

        match args.command {
            Commands::Check { endpoint, format } => {
                assert_eq!(endpoint.as_deref(), Some("mainnet"));
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("期望Check命令，实际为: {other:?}"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let args = Args::try_parse_from(["chain-vitals", "validate"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.yaml"));
    }
}
