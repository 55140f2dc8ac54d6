//! Chain Vitals - 区块链RPC端点健康监控工具
//!
//! 这是一个用Rust编写的区块链JSON-RPC端点健康监控工具，支持：
//! - 周期性探测多个RPC端点的存活状态与链高度
//! - 连接/调用/解码三类错误分类
//! - Prometheus拉取式指标暴露
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod hex;
pub mod logging;
pub mod metrics;
pub mod probe;
pub mod web;

// 重新导出主要类型
pub use config::{Config, Endpoint};
pub use error::{ChainVitalsError, ProbeError};
pub use health::{HealthCheckEngine, ProbeOutcome, ProbeScheduler};
pub use metrics::MetricsRegistry;
pub use probe::{HttpRpcProbe, RpcProbe};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
