//! Request ID middleware
//!
//! 每个请求一个 ID：优先沿用上游网关传入的 `x-request-id`，否则生成 UUID v4。
//! ID 写入 tracing span 和响应头，方便日志关联。

use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
};
use tracing::{Instrument, info_span};
use uuid::Uuid;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 上游 ID 的最大长度，超出则重新生成
const MAX_INCOMING_ID_LEN: usize = 128;

/// 请求 ID，handler 可通过 `req.extensions()` 取出
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
    pub async fn tag_request(
        req: ServiceRequest,
        next: Next<impl MessageBody>,
    ) -> Result<ServiceResponse<impl MessageBody>, Error> {
        let id = Self::reuse_incoming(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(RequestId(id.clone()));

        let span = info_span!("request", request_id = %id, method = %req.method(), path = %req.path());
        let mut res = next.call(req).instrument(span).await?;

        if let Ok(value) = HeaderValue::from_str(&id) {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Ok(res)
    }

    fn reuse_incoming(req: &ServiceRequest) -> Option<String> {
        let raw = req.headers().get(&REQUEST_ID_HEADER)?.to_str().ok()?.trim();
        (!raw.is_empty() && raw.len() <= MAX_INCOMING_ID_LEN).then(|| raw.to_owned())
    }
}
