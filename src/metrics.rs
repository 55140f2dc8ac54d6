//! 指标注册表模块
//!
//! 提供进程级的健康指标注册表与Prometheus文本导出

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

/// 健康标志指标名
pub const RPC_HEALTHY_METRIC: &str = "blockchain_rpc_healthy";
/// 区块高度指标名
pub const BLOCK_NUMBER_METRIC: &str = "blockchain_block_number";

/// 进程级指标注册表
///
/// 在启动时构造一次，由探测引擎（写者）与指标服务（读者）共享引用。
/// 每个端点名对应一对计量值，覆盖写入，读者不会观察到撕裂值。
pub struct MetricsRegistry {
    /// 注册表
    registry: Registry,
    /// 端点健康标志（1=健康，0=不健康）
    rpc_healthy: GaugeVec,
    /// 端点最新区块高度
    block_number: GaugeVec,
}

impl MetricsRegistry {
    /// 创建新的指标注册表
    ///
    /// # 返回
    /// * `Result<Self, prometheus::Error>` - 注册表实例
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let rpc_healthy = GaugeVec::new(
            Opts::new(
                RPC_HEALTHY_METRIC,
                "Indicates if the blockchain RPC endpoint is healthy (1 for healthy, 0 for unhealthy).",
            ),
            &["endpoint"],
        )?;

        let block_number = GaugeVec::new(
            Opts::new(
                BLOCK_NUMBER_METRIC,
                "The current block number of the blockchain.",
            ),
            &["endpoint"],
        )?;

        registry.register(Box::new(rpc_healthy.clone()))?;
        registry.register(Box::new(block_number.clone()))?;

        Ok(Self {
            registry,
            rpc_healthy,
            block_number,
        })
    }

    /// 标记端点健康并写入最新区块高度
    ///
    /// 健康标志先于区块高度写入，两者属于同一周期的同一次更新
    pub fn set_healthy(&self, endpoint: &str, block_height: i64) {
        self.rpc_healthy.with_label_values(&[endpoint]).set(1.0);
        self.block_number
            .with_label_values(&[endpoint])
            .set(block_height as f64);
    }

    /// 标记端点不健康
    ///
    /// 区块高度保持上一次的值不变
    pub fn set_unhealthy(&self, endpoint: &str) {
        self.rpc_healthy.with_label_values(&[endpoint]).set(0.0);
    }

    /// 读取端点健康标志的当前值
    pub fn healthy_value(&self, endpoint: &str) -> f64 {
        self.rpc_healthy.with_label_values(&[endpoint]).get()
    }

    /// 读取端点区块高度的当前值
    pub fn block_number_value(&self, endpoint: &str) -> f64 {
        self.block_number.with_label_values(&[endpoint]).get()
    }

    /// 获取Prometheus文本格式的指标
    ///
    /// # 返回
    /// * `Result<String, prometheus::Error>` - 编码后的指标文本
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
