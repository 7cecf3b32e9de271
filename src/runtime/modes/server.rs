//! Server mode
//!
//! Configures the HTTP server with the handlers enabled for this
//! deployment and runs it until Ctrl+C.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders, from_fn},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{health_routes, metrics_routes, redirect_routes, shorten_routes};
use crate::config::{HANDLER_METRICS, HANDLER_REDIRECT, HANDLER_SHORTEN, ServerConfig};
use crate::runtime::lifetime::{self, StartupContext};

/// Register app data and the enabled routes
///
/// `/health` is always mounted.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    context: &StartupContext,
    server: &ServerConfig,
) {
    cfg.app_data(web::Data::new(context.ledger.clone()))
        .app_data(web::Data::new(context.resolver.clone()))
        .app_data(web::Data::new(context.aggregator.clone()))
        .app_data(web::PayloadConfig::new(1024 * 1024))
        .service(health_routes());

    if server.handler_enabled(HANDLER_SHORTEN) {
        cfg.service(shorten_routes());
    }
    if server.handler_enabled(HANDLER_REDIRECT) {
        cfg.service(redirect_routes());
    }
    if server.handler_enabled(HANDLER_METRICS) {
        cfg.service(metrics_routes());
    }
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = crate::config::get_config();

    let context = lifetime::prepare_startup(&config).await.map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    let server_config = config.server.clone();
    let cpu_count = server_config.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);
    info!("Enabled handlers: {}", server_config.handlers.join(", "));

    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    let app_server_config = server_config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .wrap(Compress::default())
            .wrap(from_fn(RequestIdMiddleware::tag_request))
            // 最后 wrap 的在最外层
            .wrap(from_fn(TimingMiddleware::log_latency))
            .configure(|cfg| configure_app(cfg, &context, &app_server_config))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
