//! 脚本化探测客户端
//!
//! 按预设脚本返回确定性结果，用于替换真实网络客户端进行测试

use crate::error::ProbeError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::RpcProbe;

/// 脚本化探测客户端实现
///
/// 每个URL维护一个预设结果队列，调用时按顺序弹出；
/// 队列耗尽后返回调用失败
#[derive(Default)]
pub struct ScriptedProbe {
    /// URL到预设结果队列的映射
    outcomes: Mutex<HashMap<String, VecDeque<Result<String, ProbeError>>>>,
    /// 累计调用次数
    calls: AtomicUsize,
}

impl ScriptedProbe {
    /// 创建新的脚本化探测客户端
    pub fn new() -> Self {
        Self::default()
    }

    /// 为指定URL追加一个预设结果
    ///
    /// # 参数
    /// * `url` - 端点URL
    /// * `outcome` - 该URL下一次调用返回的结果
    pub fn push_outcome(&self, url: &str, outcome: Result<String, ProbeError>) {
        let mut outcomes = self.outcomes.lock().unwrap();
        outcomes.entry(url.to_string()).or_default().push_back(outcome);
    }

    /// 为指定URL追加一个成功结果（builder风格）
    pub fn with_result(self, url: &str, raw: &str) -> Self {
        self.push_outcome(url, Ok(raw.to_string()));
        self
    }

    /// 为指定URL追加一个失败结果（builder风格）
    pub fn with_error(self, url: &str, error: ProbeError) -> Self {
        self.push_outcome(url, Err(error));
        self
    }

    /// 获取累计调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcProbe for ScriptedProbe {
    async fn call(
        &self,
        url: &str,
        _method: &str,
        _deadline: Duration,
    ) -> Result<String, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut outcomes = self.outcomes.lock().unwrap();
        match outcomes.get_mut(url).and_then(|queue| queue.pop_front()) {
            Some(outcome) => outcome,
            None => Err(ProbeError::CallError(format!("无脚本结果: {url}"))),
        }
    }
}
