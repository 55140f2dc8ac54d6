//! 指标HTTP服务器实现
//!
//! 在配置的监听地址上提供 GET /metrics 拉取接口

use crate::error::{ChainVitalsError, Result};
use crate::metrics::MetricsRegistry;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// 指标HTTP服务器
pub struct MetricsServer {
    /// 监听地址
    bind_address: String,
    /// 指标注册表
    metrics: Arc<MetricsRegistry>,
}

impl MetricsServer {
    /// 创建新的指标服务器
    ///
    /// # 参数
    /// * `bind_address` - 监听地址，如 `0.0.0.0:8080`
    /// * `metrics` - 指标注册表
    ///
    /// # 返回
    /// * `Self` - 服务器实例
    pub fn new(bind_address: String, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            bind_address,
            metrics,
        }
    }

    /// 解析监听地址
    fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            ChainVitalsError::Other(anyhow::anyhow!(
                "解析监听地址失败 {}: {}",
                self.bind_address,
                e
            ))
        })
    }

    /// 启动服务器并阻塞至收到关闭信号
    ///
    /// # 参数
    /// * `shutdown_rx` - 关闭信号接收器
    ///
    /// # 返回
    /// * `Result<()>` - 运行结果
    pub async fn start(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let addr = self.socket_addr()?;

        let app = Router::new()
            .route("/metrics", get(metrics_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.metrics));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("指标服务器已启动: http://{}/metrics", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("指标服务器收到关闭信号");
            })
            .await?;

        info!("指标服务器已关闭");
        Ok(())
    }
}

/// 指标处理器
async fn metrics_handler(State(metrics): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    match metrics.gather() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("收集指标失败: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to gather metrics").into_response()
        }
    }
}
