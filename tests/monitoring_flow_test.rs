//! 端到端监控流程集成测试
//!
//! 覆盖从配置加载到调度、探测、指标导出的完整链路

use chain_vitals::config::{ConfigLoader, YamlConfigLoader};
use chain_vitals::error::ProbeError;
use chain_vitals::health::{HealthCheckEngine, ProbeScheduler};
use chain_vitals::metrics::MetricsRegistry;
use chain_vitals::probe::{HttpRpcProbe, RpcProbe, ScriptedProbe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const CONFIG_YAML: &str = r#"
endpoints:
  - name: mainnet
    url: http://127.0.0.1:1
  - name: backup
    url: http://127.0.0.1:2
interval: 5
probe_timeout_seconds: 2
"#;

fn engine_from_script(
    probe: ScriptedProbe,
    endpoints: &[(&str, &str)],
) -> (Arc<HealthCheckEngine>, Arc<MetricsRegistry>) {
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let endpoints = endpoints
        .iter()
        .map(|(name, url)| chain_vitals::config::Endpoint {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect();
    let engine = Arc::new(HealthCheckEngine::new(
        Arc::new(probe),
        Arc::clone(&metrics),
        endpoints,
        "eth_blockNumber".to_string(),
        Duration::from_secs(2),
    ));
    (engine, metrics)
}

#[tokio::test]
async fn test_config_to_engine_flow() {
    let loader = YamlConfigLoader::new(false);
    let config = loader.load_from_string(CONFIG_YAML).await.unwrap();

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let probe = Arc::new(HttpRpcProbe::new().unwrap());
    let engine = HealthCheckEngine::new(
        probe,
        Arc::clone(&metrics),
        config.endpoints.clone(),
        config.method.clone(),
        Duration::from_secs(config.probe_timeout_seconds),
    );

    assert_eq!(engine.endpoints().len(), 2);

    // 两个端点均不可达，周期完成后健康标志均为0
    let outcomes = engine.run_cycle().await;
    assert_eq!(outcomes.len(), 2);
    for (_, outcome) in &outcomes {
        assert!(!outcome.is_healthy());
    }
    assert_eq!(metrics.healthy_value("mainnet"), 0.0);
    assert_eq!(metrics.healthy_value("backup"), 0.0);
}

#[tokio::test]
async fn test_full_cycle_exports_prometheus_text() {
    let probe = ScriptedProbe::new()
        .with_result("http://a", "0x1b4")
        .with_error("http://b", ProbeError::ConnectError("连接被拒绝".to_string()));
    let (engine, metrics) = engine_from_script(probe, &[("a", "http://a"), ("b", "http://b")]);

    engine.run_cycle().await;

    let text = metrics.gather().unwrap();
    assert!(text.contains(r#"blockchain_rpc_healthy{endpoint="a"} 1"#));
    assert!(text.contains(r#"blockchain_rpc_healthy{endpoint="b"} 0"#));
    assert!(text.contains(r#"blockchain_block_number{endpoint="a"} 436"#));
}

#[tokio::test]
async fn test_scheduler_drives_cycles_until_shutdown() {
    let probe = ScriptedProbe::new();
    for _ in 0..4 {
        probe.push_outcome("http://a", Ok("0x10".to_string()));
    }
    let probe = Arc::new(probe);

    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    let engine = Arc::new(HealthCheckEngine::new(
        Arc::clone(&probe) as Arc<dyn RpcProbe>,
        Arc::clone(&metrics),
        vec![chain_vitals::config::Endpoint {
            name: "a".to_string(),
            url: "http://a".to_string(),
        }],
        "eth_blockNumber".to_string(),
        Duration::from_secs(1),
    ));

    let scheduler = ProbeScheduler::with_period(Arc::clone(&engine), Duration::from_millis(50));
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    // 启动时不立即探测
    assert_eq!(probe.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(180)).await;
    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(probe.call_count() >= 2);
    assert_eq!(metrics.healthy_value("a"), 1.0);
    assert_eq!(metrics.block_number_value("a"), 16.0);
}

#[tokio::test]
async fn test_failure_then_recovery_across_cycles() {
    let probe = ScriptedProbe::new()
        .with_result("http://a", "0x64")
        .with_error("http://a", ProbeError::CallError("超时".to_string()))
        .with_result("http://a", "0x65");
    let (engine, metrics) = engine_from_script(probe, &[("a", "http://a")]);

    engine.run_cycle().await;
    assert_eq!(metrics.healthy_value("a"), 1.0);
    assert_eq!(metrics.block_number_value("a"), 100.0);

    // 失败周期只清健康标志，区块高度保留陈旧值
    engine.run_cycle().await;
    assert_eq!(metrics.healthy_value("a"), 0.0);
    assert_eq!(metrics.block_number_value("a"), 100.0);

    engine.run_cycle().await;
    assert_eq!(metrics.healthy_value("a"), 1.0);
    assert_eq!(metrics.block_number_value("a"), 101.0);
}
