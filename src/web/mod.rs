//! Web指标服务模块
//!
//! 提供Prometheus拉取端点的HTTP服务器

pub mod server;

pub use server::MetricsServer;
