use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{MetricsAggregator, RedirectResolver, UrlLedger};
use crate::storage::{RecordStore, StoreFactory};

/// 服务器与 CLI 共用的运行时对象
#[derive(Clone)]
pub struct StartupContext {
    pub store: Arc<dyn RecordStore>,
    pub ledger: Arc<UrlLedger>,
    pub resolver: Arc<RedirectResolver>,
    pub aggregator: Arc<MetricsAggregator>,
}

impl StartupContext {
    /// 基于已有的 store 组装服务
    pub fn from_store(store: Arc<dyn RecordStore>, config: &StaticConfig) -> Self {
        let ledger = Arc::new(UrlLedger::from_config(
            store.clone(),
            config.storage.key.clone(),
            &config.ledger,
        ));
        Self {
            resolver: Arc::new(RedirectResolver::new(ledger.clone())),
            aggregator: Arc::new(MetricsAggregator::new(ledger.clone())),
            ledger,
            store,
        }
    }
}

/// 校验配置并创建存储后端
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    config.validate().context("Invalid configuration")?;

    let store = StoreFactory::create(&config.storage)
        .await
        .context("Failed to create record store")?;

    info!(
        "Ledger at {}://{}/{} (write mode: {})",
        store.backend_name(),
        store.bucket(),
        config.storage.key,
        config.ledger.write_mode
    );

    let context = StartupContext::from_store(store, config);
    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
