//! HTTP 响应帮助函数

use actix_web::HttpResponse;
use serde::Serialize;

use crate::errors::ShortledgerError;

use super::types::ErrorBody;

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 从 ShortledgerError 构建错误响应
pub fn error_response(err: &ShortledgerError) -> HttpResponse {
    let status = err.http_status();
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            message: err.message().to_string(),
            code: status.as_u16(),
        })
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(&e),
    }
}
