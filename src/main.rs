//! Chain Vitals 主程序入口
//!
//! 周期性探测区块链JSON-RPC端点，并通过Prometheus指标暴露健康状态

use anyhow::Context;
use chain_vitals::cli::{
    Args, CheckCommand, Command, Commands, ValidateCommand, VersionCommand,
};
use chain_vitals::config::{ConfigLoader, YamlConfigLoader};
use chain_vitals::health::{HealthCheckEngine, ProbeScheduler};
use chain_vitals::logging::{setup_logging, LogConfig};
use chain_vitals::metrics::MetricsRegistry;
use chain_vitals::probe::HttpRpcProbe;
use chain_vitals::web::MetricsServer;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.log_json,
    };
    setup_logging(&log_config).context("初始化日志系统失败")?;

    info!(
        "{} v{} 启动，日志级别: {}",
        chain_vitals::APP_NAME,
        chain_vitals::VERSION,
        args.log_level
    );

    execute_command(&args).await
}

/// 分发并执行子命令
async fn execute_command(args: &Args) -> anyhow::Result<()> {
    match &args.command {
        Commands::Start { interval } => start_service(args, *interval).await,
        Commands::Check { .. } => Ok(CheckCommand.execute(args).await?),
        Commands::Validate { .. } => Ok(ValidateCommand.execute(args).await?),
        Commands::Version { .. } => Ok(VersionCommand.execute(args).await?),
    }
}

/// 启动健康监控服务
async fn start_service(args: &Args, interval_override: Option<u64>) -> anyhow::Result<()> {
    // 加载配置
    let loader = YamlConfigLoader::new(true);
    let mut config = loader
        .load_from_file(&args.config)
        .await
        .with_context(|| format!("加载配置文件失败: {}", args.config.display()))?;

    // 命令行覆盖探测间隔后重新验证
    if let Some(minutes) = interval_override {
        config.interval = minutes;
        loader.validate(&config)?;
    }

    info!(
        "已加载配置: {}个端点, 探测间隔{}分钟, 方法{}",
        config.endpoints.len(),
        config.interval,
        config.method
    );

    // 组装核心组件
    let metrics = Arc::new(MetricsRegistry::new()?);
    let probe = Arc::new(HttpRpcProbe::new()?);
    let engine = Arc::new(HealthCheckEngine::new(
        probe,
        Arc::clone(&metrics),
        config.endpoints.clone(),
        config.method.clone(),
        Duration::from_secs(config.probe_timeout_seconds),
    ));

    // 关闭信号广播
    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("监听Ctrl+C信号失败: {}", e);
            return;
        }
        info!("收到Ctrl+C信号，开始优雅关闭");
        let _ = signal_tx.send(());
    });

    // 启动探测调度器
    let scheduler = ProbeScheduler::new(Arc::clone(&engine), config.interval);
    let scheduler_rx = shutdown_tx.subscribe();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(scheduler_rx).await;
    });

    // 指标服务器在当前任务中阻塞运行
    let server = MetricsServer::new(config.prometheus.address.clone(), metrics);
    server.start(shutdown_tx.subscribe()).await?;

    // 等待调度器退出
    if let Err(e) = scheduler_handle.await {
        error!("探测调度器任务异常退出: {}", e);
    }

    info!("服务已关闭");
    Ok(())
}
