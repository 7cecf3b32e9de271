use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::services::UrlLedger;

use super::types::HealthResponse;

/// Health Service
///
/// 直接探测存储：只做一次 exists，不读取账本内容。
pub struct HealthService;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

impl HealthService {
    pub async fn health_check(ledger: web::Data<Arc<UrlLedger>>) -> impl Responder {
        let started = Instant::now();
        let store = ledger.store();
        let backend = store.backend_name().to_string();

        let (ledger_exists, failure) =
            match tokio::time::timeout(PROBE_TIMEOUT, store.exists(ledger.key())).await {
                Ok(Ok(exists)) => (exists, None),
                Ok(Err(e)) => {
                    error!("{} store probe failed: {}", backend, e);
                    (false, Some(e.message().to_string()))
                }
                Err(_) => {
                    error!("{} store probe timed out after {:?}", backend, PROBE_TIMEOUT);
                    (false, Some("timeout".to_string()))
                }
            };

        let status = if failure.is_none() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        let body = HealthResponse {
            status: if failure.is_none() { "healthy" } else { "unhealthy" }.to_string(),
            backend,
            ledger_exists,
            error: failure,
        };
        debug!("health: {} in {:?}", body.status, started.elapsed());

        HttpResponse::build(status).json(body)
    }
}

/// `/health` 同时响应 GET 和 HEAD
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
