//! 请求耗时日志
//!
//! Every request ends with one line carrying method, path, status and latency.

use actix_web::{
    Error,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use std::time::Instant;
use tracing::{debug, warn};

/// 超过该耗时的请求以 warn 级别记录
const SLOW_REQUEST_MS: u128 = 1000;

pub struct TimingMiddleware;

impl TimingMiddleware {
    /// Wrap with `from_fn(TimingMiddleware::log_latency)`; mount it outermost
    /// so the measured time includes the other middleware.
    pub async fn log_latency(
        req: ServiceRequest,
        next: Next<impl MessageBody>,
    ) -> Result<ServiceResponse<impl MessageBody>, Error> {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();

        let outcome = next.call(req).await;
        let took = started.elapsed();
        let status = match &outcome {
            Ok(res) => res.status(),
            Err(err) => err.as_response_error().status_code(),
        };

        if took.as_millis() < SLOW_REQUEST_MS {
            debug!(%method, %path, status = status.as_u16(), ?took, "request finished");
        } else {
            warn!(%method, %path, status = status.as_u16(), ?took, "slow request");
        }

        outcome
    }
}
