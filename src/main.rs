// ==========================================
// WCM 设备台账 - HTTP 服务入口
// ==========================================
// 环境变量:
// - WCM_LEDGER_DB_PATH: 数据库文件（缺省为用户数据目录）
// - WCM_LEDGER_ADDR: 监听地址（缺省 127.0.0.1:8080）
// - RUST_LOG / WCM_LEDGER_LOG_FORMAT: 日志级别 / 格式
// ==========================================

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use wcm_ledger::app::{get_default_db_path, http, AppState};
use wcm_ledger::logging;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 维护计划台账服务", wcm_ledger::APP_NAME);
    tracing::info!("系统版本: {}", wcm_ledger::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(&db_path).map_err(anyhow::Error::msg)?;
    let app = http::router(Arc::new(state));

    let addr: SocketAddr = std::env::var("WCM_LEDGER_ADDR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
        .trim()
        .parse()
        .context("WCM_LEDGER_ADDR 格式错误")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法监听地址: {}", addr))?;
    tracing::info!("HTTP 服务已启动: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("监听退出信号失败: {}", e);
    }
}
