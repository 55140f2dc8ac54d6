//! 探测调度器
//!
//! 按固定间隔触发引擎的探测周期

use crate::health::engine::HealthCheckEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// 周期调度器
///
/// 首个周期在第一个完整间隔之后才开始，启动时不立即探测。
/// 每个周期在独立任务中执行，迟到的tick与上一周期重叠而不是排队。
pub struct ProbeScheduler {
    /// 健康检测引擎
    engine: Arc<HealthCheckEngine>,
    /// 探测间隔
    period: Duration,
}

impl ProbeScheduler {
    /// 创建新的调度器
    ///
    /// # 参数
    /// * `engine` - 健康检测引擎
    /// * `interval_minutes` - 探测间隔（分钟）
    ///
    /// # 返回
    /// * `Self` - 调度器实例
    pub fn new(engine: Arc<HealthCheckEngine>, interval_minutes: u64) -> Self {
        Self::with_period(engine, Duration::from_secs(interval_minutes * 60))
    }

    /// 以任意间隔创建调度器
    ///
    /// # 参数
    /// * `engine` - 健康检测引擎
    /// * `period` - 探测间隔
    pub fn with_period(engine: Arc<HealthCheckEngine>, period: Duration) -> Self {
        Self { engine, period }
    }

    /// 运行调度循环，直到收到关闭信号
    ///
    /// # 参数
    /// * `shutdown_rx` - 关闭信号接收器
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        // 错过的tick直接跳过，不做追赶
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("调度器已启动，探测间隔: {:?}", self.period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!("调度器触发探测周期");
                    let engine = Arc::clone(&self.engine);
                    tokio::spawn(async move {
                        engine.run_cycle().await;
                    });
                }
                _ = shutdown_rx.recv() => {
                    info!("调度器收到关闭信号，停止调度");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoint;
    use crate::error::ProbeError;
    use crate::metrics::MetricsRegistry;
    use crate::probe::{RpcProbe, ScriptedProbe};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_engine(probe: Arc<dyn RpcProbe>) -> Arc<HealthCheckEngine> {
        let metrics = Arc::new(MetricsRegistry::new().unwrap());
        Arc::new(HealthCheckEngine::new(
            probe,
            metrics,
            vec![Endpoint {
                name: "a".to_string(),
                url: "http://a".to_string(),
            }],
            "eth_blockNumber".to_string(),
            Duration::from_secs(1),
        ))
    }

    /// 让已就绪的任务（调度器循环与其派生的周期任务）执行完毕
    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    /// 响应耗时固定的探测客户端，用于观察周期重叠
    struct SlowProbe {
        delay: Duration,
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    #[async_trait]
    impl RpcProbe for SlowProbe {
        async fn call(
            &self,
            _url: &str,
            _method: &str,
            _deadline: Duration,
        ) -> Result<String, ProbeError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok("0x1".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_waits_full_interval() {
        let probe = Arc::new(ScriptedProbe::new());
        probe.push_outcome("http://a", Ok("0x1".to_string()));

        let engine = test_engine(Arc::clone(&probe) as Arc<dyn RpcProbe>);
        let scheduler = ProbeScheduler::with_period(engine, Duration::from_millis(100));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
        settle().await;

        // 半个间隔内不应有任何探测
        tokio::time::advance(Duration::from_millis(50)).await;
        settle().await;
        assert_eq!(probe.call_count(), 0);

        // 跨过首个完整间隔后出现第一次探测
        tokio::time::advance(Duration::from_millis(60)).await;
        settle().await;
        assert_eq!(probe.call_count(), 1);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_scheduling() {
        let probe = Arc::new(ScriptedProbe::new());
        let engine = test_engine(Arc::clone(&probe) as Arc<dyn RpcProbe>);
        let scheduler = ProbeScheduler::with_period(engine, Duration::from_millis(50));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
        settle().await;

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        // 关闭后时间继续推进也不再有探测
        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_cycles() {
        let probe = Arc::new(ScriptedProbe::new());
        for _ in 0..4 {
            probe.push_outcome("http://a", Ok("0x1".to_string()));
        }

        let engine = test_engine(Arc::clone(&probe) as Arc<dyn RpcProbe>);
        let scheduler = ProbeScheduler::with_period(engine, Duration::from_millis(40));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
        settle().await;

        // 每跨过一个间隔恰好触发一个周期
        for expected in 1..=4 {
            tokio::time::advance(Duration::from_millis(40)).await;
            settle().await;
            assert_eq!(probe.call_count(), expected);
        }

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_cycle_overlaps_next_tick() {
        // 单周期耗时超过两个间隔
        let probe = Arc::new(SlowProbe {
            delay: Duration::from_millis(250),
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        });

        let engine = test_engine(Arc::clone(&probe) as Arc<dyn RpcProbe>);
        let scheduler = ProbeScheduler::with_period(engine, Duration::from_millis(100));

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });
        settle().await;

        tokio::time::advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(probe.started.load(Ordering::SeqCst), 1);

        // 第一个周期仍在进行时，下一个tick照常触发新周期而不是排队等待
        tokio::time::advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(probe.started.load(Ordering::SeqCst), 2);
        assert_eq!(probe.finished.load(Ordering::SeqCst), 0);

        // 两个重叠的周期各自完成
        tokio::time::advance(Duration::from_millis(300)).await;
        settle().await;
        assert_eq!(probe.finished.load(Ordering::SeqCst), 2);

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
