//! HTTP 服务器
//!
//! 在 `std::net::TcpListener` 上运行 `axum::Server`，支持优雅关闭；
//! `spawn_server` 允许端口 0，测试用它拿到实际绑定地址。

use std::future::Future;
use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;

/// 运行中的服务器句柄（测试与嵌入场景使用）
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: JoinHandle<Result<(), hyper::Error>>,
}

impl ServerHandle {
    /// 触发优雅关闭并等待服务器退出
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.join
            .await
            .context("server task panicked")?
            .context("server error")?;
        Ok(())
    }
}

/// 绑定地址并一直服务到 `shutdown` 完成
pub async fn serve<F>(addr: SocketAddr, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(addr)?;
    serve_listener(listener, app, shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("trivia api server error: {}", e))
}

/// 在后台启动服务器；`addr` 端口可为 0，实际地址见返回值
pub fn spawn_server(addr: SocketAddr, app: Router) -> Result<ServerHandle> {
    let listener = bind(addr)?;
    let bound = listener
        .local_addr()
        .context("failed to read bound address")?;

    let (tx, rx) = oneshot::channel::<()>();
    let join = tokio::spawn(serve_listener(listener, app, async {
        let _ = rx.await;
    }));

    Ok(ServerHandle {
        addr: bound,
        shutdown_tx: Some(tx),
        join,
    })
}

fn bind(addr: SocketAddr) -> Result<StdTcpListener> {
    let listener =
        StdTcpListener::bind(addr).with_context(|| format!("failed to bind {}", addr))?;
    listener
        .set_nonblocking(true)
        .context("failed to set listener non-blocking")?;
    Ok(listener)
}

async fn serve_listener<F>(
    listener: StdTcpListener,
    app: Router,
    shutdown: F,
) -> Result<(), hyper::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server = axum::Server::from_tcp(listener)?.serve(app.into_make_service());
    info!(
        "[Api::Server] Trivia API listening on http://{}",
        server.local_addr()
    );

    server.with_graceful_shutdown(shutdown).await?;
    info!("[Api::Server] Trivia API stopped");
    Ok(())
}
