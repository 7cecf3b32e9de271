use std::sync::Arc;

use actix_web::{Responder, web};
use tracing::{debug, trace};

use crate::errors::{Result, ShortledgerError};
use crate::services::{EMPTY_URL_MESSAGE, UrlLedger};

use super::helpers::{error_response, success_response};
use super::types::ShortenRequest;

pub struct ShortenService;

impl ShortenService {
    pub async fn shorten(ledger: web::Data<Arc<UrlLedger>>, body: web::Bytes) -> impl Responder {
        let request = match Self::parse_body(&body) {
            Ok(request) => request,
            Err(e) => return error_response(&e),
        };
        let url = request.url.unwrap_or_default();
        trace!("Shorten request for '{}'", url);

        match ledger.shorten(&url).await {
            Ok(outcome) => success_response(outcome.record),
            Err(e) => {
                debug!("Shorten failed for '{}': {}", url, e);
                error_response(&e)
            }
        }
    }

    /// 空 body 与 `null` 都视为缺少 url
    fn parse_body(body: &[u8]) -> Result<ShortenRequest> {
        if body.is_empty() {
            return Err(ShortledgerError::invalid_input(EMPTY_URL_MESSAGE));
        }
        serde_json::from_slice::<Option<ShortenRequest>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                debug!("Malformed shorten body: {}", e);
                ShortledgerError::invalid_input(e.to_string())
            })
    }
}

/// Shorten 路由配置
pub fn shorten_routes() -> actix_web::Scope {
    web::scope("/shorten").route("", web::post().to(ShortenService::shorten))
}

