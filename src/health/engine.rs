//! 健康检测引擎
//!
//! 每个周期对所有配置端点各执行一次探测，解码结果并更新指标

use crate::config::Endpoint;
use crate::error::ProbeError;
use crate::hex::hex_to_int;
use crate::metrics::MetricsRegistry;
use crate::probe::RpcProbe;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// 单个端点一次探测的结局
///
/// 每周期新建，不跨周期保留
#[derive(Debug)]
pub enum ProbeOutcome {
    /// 探测成功，携带解码后的区块高度
    Healthy {
        /// 区块高度
        block_height: i64,
    },
    /// 探测失败，携带分类后的错误
    Unhealthy {
        /// 失败原因
        reason: ProbeError,
    },
}

impl ProbeOutcome {
    /// 判断结局是否为健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy { .. })
    }
}

/// 健康检测引擎
///
/// 对端点列表持只读引用，指标注册表是唯一的共享可变状态
pub struct HealthCheckEngine {
    /// 探测客户端
    probe: Arc<dyn RpcProbe>,
    /// 指标注册表
    metrics: Arc<MetricsRegistry>,
    /// 端点配置列表
    endpoints: Vec<Endpoint>,
    /// 探测使用的RPC方法名
    method: String,
    /// 单次探测的截止时间
    probe_timeout: Duration,
}

impl HealthCheckEngine {
    /// 创建新的健康检测引擎
    ///
    /// # 参数
    /// * `probe` - 探测客户端
    /// * `metrics` - 指标注册表
    /// * `endpoints` - 端点配置列表
    /// * `method` - RPC方法名
    /// * `probe_timeout` - 单次探测的截止时间
    ///
    /// # 返回
    /// * `Self` - 引擎实例
    pub fn new(
        probe: Arc<dyn RpcProbe>,
        metrics: Arc<MetricsRegistry>,
        endpoints: Vec<Endpoint>,
        method: String,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            probe,
            metrics,
            endpoints,
            method,
            probe_timeout,
        }
    }

    /// 获取端点配置列表
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// 执行一个完整探测周期
    ///
    /// 所有端点并发探测，全部完成后周期才算结束；
    /// 端点之间互不影响，也没有顺序保证
    ///
    /// # 返回
    /// * `Vec<(String, ProbeOutcome)>` - 每个端点名及其本周期的结局
    pub async fn run_cycle(&self) -> Vec<(String, ProbeOutcome)> {
        debug!("开始探测周期，端点数量: {}", self.endpoints.len());

        let tasks = self
            .endpoints
            .iter()
            .map(|endpoint| async move {
                let outcome = self.check_endpoint(endpoint).await;
                (endpoint.name.clone(), outcome)
            });

        join_all(tasks).await
    }

    /// 探测单个端点并更新指标
    ///
    /// 失败只写健康标志，不触碰区块高度；
    /// 本周期内不重试，恢复依赖下一次调度
    ///
    /// # 参数
    /// * `endpoint` - 端点配置
    ///
    /// # 返回
    /// * `ProbeOutcome` - 本次探测的结局
    pub async fn check_endpoint(&self, endpoint: &Endpoint) -> ProbeOutcome {
        debug!("探测端点: {} 方法: {}", endpoint.url, self.method);

        let outcome = match self
            .probe
            .call(&endpoint.url, &self.method, self.probe_timeout)
            .await
        {
            Ok(raw) => {
                debug!("端点 {} 原始返回: {}", endpoint.url, raw);
                match hex_to_int(&raw) {
                    Ok(block_height) => ProbeOutcome::Healthy { block_height },
                    Err(reason) => ProbeOutcome::Unhealthy { reason },
                }
            }
            Err(reason) => ProbeOutcome::Unhealthy { reason },
        };

        match &outcome {
            ProbeOutcome::Healthy { block_height } => {
                self.metrics.set_healthy(&endpoint.name, *block_height);
                info!("端点 {} 探测正常，区块高度: {}", endpoint.name, block_height);
            }
            ProbeOutcome::Unhealthy { reason } => {
                self.metrics.set_unhealthy(&endpoint.name);
                error!("端点 {} 探测失败: {}", endpoint.name, reason);
            }
        }

        outcome
    }
}
