//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::{ConfigLoader, YamlConfigLoader};
use crate::error::{ConfigError, Result};
use crate::health::{HealthCheckEngine, ProbeOutcome};
use crate::metrics::MetricsRegistry;
use crate::probe::HttpRpcProbe;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

/// 验证命令
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate { verbose } = &args.command {
            println!("验证配置文件: {}", args.config.display());

            let loader = YamlConfigLoader::new(true);
            let config = loader.load_from_file(&args.config).await?;

            if *verbose {
                println!("配置验证通过！");
                println!("全局配置:");
                println!("  探测间隔: {}分钟", config.interval);
                println!("  RPC方法: {}", config.method);
                println!("  探测截止时间: {}秒", config.probe_timeout_seconds);
                println!("  指标监听地址: {}", config.prometheus.address);

                println!("端点配置:");
                for (i, endpoint) in config.endpoints.iter().enumerate() {
                    println!("  {}. {} ({})", i + 1, endpoint.name, endpoint.url);
                }
            } else {
                println!("✓ 配置文件验证通过");
                println!("✓ 找到 {} 个端点配置", config.endpoints.len());
            }
        }
        Ok(())
    }
}

/// 检测命令
///
/// 跳过调度器，立刻执行一个探测周期并输出结果
pub struct CheckCommand;

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Check { endpoint, format } = &args.command {
            self.perform_check(args, endpoint.as_deref(), format).await
        } else {
            Ok(())
        }
    }
}

impl CheckCommand {
    /// 执行一次性探测
    async fn perform_check(
        &self,
        args: &Args,
        endpoint_filter: Option<&str>,
        format: &OutputFormat,
    ) -> Result<()> {
        // 加载配置
        let loader = YamlConfigLoader::new(true);
        let mut config = loader.load_from_file(&args.config).await?;

        // 按名称过滤端点
        if let Some(name) = endpoint_filter {
            config.endpoints.retain(|e| e.name == name);
            if config.endpoints.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "未找到端点: {name}"
                ))
                .into());
            }
        }

        // 组装引擎并执行单个周期
        let metrics = Arc::new(MetricsRegistry::new()?);
        let probe = Arc::new(HttpRpcProbe::new()?);
        let engine = HealthCheckEngine::new(
            probe,
            metrics,
            config.endpoints.clone(),
            config.method.clone(),
            Duration::from_secs(config.probe_timeout_seconds),
        );

        let outcomes = engine.run_cycle().await;

        match format {
            OutputFormat::Json => {
                let report: Vec<_> = outcomes
                    .iter()
                    .map(|(name, outcome)| match outcome {
                        ProbeOutcome::Healthy { block_height } => serde_json::json!({
                            "endpoint": name,
                            "healthy": true,
                            "block_height": block_height,
                        }),
                        ProbeOutcome::Unhealthy { reason } => serde_json::json!({
                            "endpoint": name,
                            "healthy": false,
                            "error": reason.to_string(),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                for (name, outcome) in &outcomes {
                    match outcome {
                        ProbeOutcome::Healthy { block_height } => {
                            println!("✓ {name}: 健康，区块高度 {block_height}");
                        }
                        ProbeOutcome::Unhealthy { reason } => {
                            println!("✗ {name}: {reason}");
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
