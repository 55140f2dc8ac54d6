//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Chain Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum ChainVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 探测相关错误
    #[error("探测错误: {0}")]
    Probe(#[from] ProbeError),

    /// 指标注册表错误
    #[error("指标错误: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 探测错误分类
///
/// 每次探测的失败结果恰好落入三类之一，引擎据此写入健康标志。
/// 超时不单独成类，归入调用失败。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 连接失败（传输层握手、DNS解析、连接被拒绝）
    #[error("连接失败: {0}")]
    ConnectError(String),

    /// 调用失败（远端返回应用层错误，或在任一阶段超出截止时间）
    #[error("调用失败: {0}")]
    CallError(String),

    /// 解码失败（结果不是合法的十六进制数量）
    #[error("解码失败: {0}")]
    DecodeError(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ChainVitalsError>;
