//! HTTP JSON-RPC探测客户端实现
//!
//! 对单个端点执行一次有界的远程调用，并对失败进行分类

use crate::error::ProbeError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

/// 探测客户端trait，定义探测接口
///
/// 真实实现走网络，测试实现返回脚本化结果
#[async_trait]
pub trait RpcProbe: Send + Sync {
    /// 对单个端点执行一次RPC调用
    ///
    /// # 参数
    /// * `url` - 端点URL
    /// * `method` - RPC方法名，无参数调用
    /// * `deadline` - 截止时间，连接建立与调用共用同一预算
    ///
    /// # 返回
    /// * `Result<String, ProbeError>` - 远端返回的原始字符串结果，
    ///   客户端不对其内容做解释
    async fn call(&self, url: &str, method: &str, deadline: Duration)
        -> Result<String, ProbeError>;
}

/// JSON-RPC响应结构
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC错误对象
#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// 基于reqwest的HTTP探测客户端
///
/// 跨调用复用连接池，单次调用的所有资源在截止时间到达或调用
/// 结束时随请求一起释放
pub struct HttpRpcProbe {
    /// HTTP客户端
    client: Client,
}

impl HttpRpcProbe {
    /// 每主机空闲连接池上限
    const MAX_IDLE_PER_HOST: usize = 100;
    /// 空闲连接保留时间
    const IDLE_TIMEOUT: Duration = Duration::from_secs(90);
    /// 连接建立子截止时间
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// 创建新的HTTP探测客户端
    ///
    /// # 返回
    /// * `Result<Self, ProbeError>` - 客户端实例
    pub fn new() -> Result<Self, ProbeError> {
        let client = Client::builder()
            .pool_max_idle_per_host(Self::MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Self::IDLE_TIMEOUT)
            .connect_timeout(Self::CONNECT_TIMEOUT)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| ProbeError::ConnectError(format!("构建HTTP客户端失败: {e}")))?;

        Ok(Self { client })
    }

    /// 对reqwest发送阶段的错误进行分类
    ///
    /// 连接阶段的失败（含DNS解析、握手、连接被拒绝）归为连接错误，
    /// 其余归为调用错误
    fn classify_send_error(error: &reqwest::Error) -> ProbeError {
        if error.is_connect() {
            ProbeError::ConnectError(format!("连接端点失败: {error}"))
        } else if error.is_timeout() {
            ProbeError::CallError(format!("请求超时: {error}"))
        } else {
            ProbeError::CallError(format!("请求失败: {error}"))
        }
    }
}

#[async_trait]
impl RpcProbe for HttpRpcProbe {
    async fn call(
        &self,
        url: &str,
        method: &str,
        deadline: Duration,
    ) -> Result<String, ProbeError> {
        let request = self.client.post(url).json(&json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": [],
            "id": 1,
        }));

        // 发送、读取与解析共用同一截止时间预算
        let call = async {
            let response = request.send().await.map_err(|e| Self::classify_send_error(&e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ProbeError::CallError(format!("HTTP状态码异常: {status}")));
            }

            let body: JsonRpcResponse = response
                .json()
                .await
                .map_err(|e| ProbeError::CallError(format!("响应解析失败: {e}")))?;

            if let Some(err) = body.error {
                return Err(ProbeError::CallError(format!(
                    "远端错误 {}: {}",
                    err.code, err.message
                )));
            }

            match body.result {
                Some(serde_json::Value::String(raw)) => Ok(raw),
                Some(other) => Err(ProbeError::CallError(format!(
                    "期望字符串结果，实际为: {other}"
                ))),
                None => Err(ProbeError::CallError("响应缺少result字段".to_string())),
            }
        };

        match timeout(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::CallError(format!(
                "探测在{}秒截止时间内未完成",
                deadline.as_secs()
            ))),
        }
    }
}
