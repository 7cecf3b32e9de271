use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::errors::ShortledgerError;
use crate::services::{EMPTY_CODE_MESSAGE, RedirectResolver};

use super::helpers::error_response;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        resolver: web::Data<Arc<RedirectResolver>>,
        path: web::Path<String>,
    ) -> impl Responder {
        let short_code = path.into_inner();

        match resolver.resolve(&short_code).await {
            Ok(target) => {
                trace!("Redirecting {} -> {}", short_code, target);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", target))
                    .finish()
            }
            Err(e) => error_response(&e),
        }
    }

    /// `/redirect` 与 `/redirect/` 没有短码
    pub async fn missing_code() -> impl Responder {
        error_response(&ShortledgerError::invalid_input(EMPTY_CODE_MESSAGE))
    }
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/redirect")
        .route("", web::get().to(RedirectService::missing_code))
        .route("/", web::get().to(RedirectService::missing_code))
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
}
