//! 配置管理模块
//!
//! 提供配置数据结构、YAML加载和验证功能

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, YamlConfigLoader};
pub use types::{validate_config, Config, Endpoint, PrometheusConfig};
