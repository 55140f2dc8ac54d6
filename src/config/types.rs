//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 主配置结构，包含端点列表和探测参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 端点配置列表
    pub endpoints: Vec<Endpoint>,
    /// 探测周期（分钟）
    pub interval: u64,
    /// 每次探测调用的RPC方法名
    #[serde(default = "default_method")]
    pub method: String,
    /// 单次探测的截止时间（秒），覆盖连接建立与调用本身
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
    /// Prometheus指标服务配置
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// 端点配置结构
///
/// 配置加载后不可变，`name`作为指标标签必须唯一
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Endpoint {
    /// 端点名称
    pub name: String,
    /// 端点URL
    pub url: String,
}

/// Prometheus指标服务配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrometheusConfig {
    /// 监听地址
    #[serde(default = "default_prometheus_address")]
    pub address: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            address: default_prometheus_address(),
        }
    }
}

// 默认值函数
fn default_method() -> String {
    "eth_blockNumber".to_string()
}

fn default_probe_timeout() -> u64 {
    30
}

fn default_prometheus_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// 配置验证函数
///
/// 验证失败在启动期即为致命错误，调度器不会启动
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证探测周期
    if config.interval == 0 {
        return Err("探测周期不能为0".to_string());
    }

    // 验证RPC方法名
    if config.method.trim().is_empty() {
        return Err("RPC方法名不能为空".to_string());
    }

    // 验证探测截止时间
    if config.probe_timeout_seconds == 0 {
        return Err("探测截止时间不能为0".to_string());
    }

    // 验证监听地址
    if config.prometheus.address.trim().is_empty() {
        return Err("Prometheus监听地址不能为空".to_string());
    }
    if config
        .prometheus
        .address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        return Err(format!(
            "无效的Prometheus监听地址: {}",
            config.prometheus.address
        ));
    }

    // 验证端点配置
    if config.endpoints.is_empty() {
        return Err("至少需要配置一个端点".to_string());
    }

    let mut seen_names = HashSet::new();
    for endpoint in &config.endpoints {
        // 验证端点名称
        if endpoint.name.trim().is_empty() {
            return Err("端点名称不能为空".to_string());
        }

        // 名称作为指标标签必须唯一
        if !seen_names.insert(endpoint.name.as_str()) {
            return Err(format!("端点名称重复: {}", endpoint.name));
        }

        // 验证URL格式
        if !endpoint.url.starts_with("http://") && !endpoint.url.starts_with("https://") {
            return Err(format!("端点 {} 的URL格式无效", endpoint.name));
        }
    }

    Ok(())
}
