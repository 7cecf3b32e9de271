use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, Responder, web};
use tracing::trace;

use crate::services::{MetricsAggregator, parse_limit};

use super::helpers::api_result;

pub struct MetricsService;

impl MetricsService {
    pub async fn top_domains(
        req: HttpRequest,
        aggregator: web::Data<Arc<MetricsAggregator>>,
    ) -> impl Responder {
        // 查询串解析失败时按未提供 limit 处理
        let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_default();
        trace!("Metrics request, limit={:?}", query.get("limit"));

        let report = match parse_limit(query.get("limit").map(String::as_str)) {
            Ok(limit) => aggregator.report(limit).await,
            Err(e) => Err(e),
        };
        api_result(report)
    }
}

/// Metrics 路由配置
pub fn metrics_routes() -> actix_web::Scope {
    web::scope("/metrics").route("", web::get().to(MetricsService::top_domains))
}
