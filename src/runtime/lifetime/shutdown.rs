use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C
///
/// 账本每次写入都是完整对象，关闭时没有需要刷新的状态。
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }
}
