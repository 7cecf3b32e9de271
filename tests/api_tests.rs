//! HTTP handler tests
//!
//! Drives the actix routes end to end against an in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::middleware::from_fn;
use actix_web::{App, web};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};

use shortledger::api::middleware::RequestIdMiddleware;
use shortledger::api::services::{ErrorBody, HealthResponse};
use shortledger::config::{HANDLER_REDIRECT, StaticConfig};
use shortledger::errors::{Result, ShortledgerError};
use shortledger::runtime::lifetime::StartupContext;
use shortledger::runtime::modes::configure_app;
use shortledger::services::{
    EMPTY_CODE_MESSAGE, EMPTY_URL_MESSAGE, INVALID_LIMIT_MESSAGE, INVALID_URL_MESSAGE,
    NO_METRICS_MESSAGE, UNKNOWN_CODE_MESSAGE,
};
use shortledger::storage::{MemoryStore, RecordStore, StoredObject};

// =============================================================================
// Test Setup
// =============================================================================

fn memory_context(config: &StaticConfig) -> StartupContext {
    StartupContext::from_store(Arc::new(MemoryStore::new("test")), config)
}

macro_rules! init_app {
    ($context:expr, $config:expr) => {{
        let context = $context.clone();
        let server = $config.server.clone();
        test::init_service(
            App::new()
                .wrap(from_fn(RequestIdMiddleware::tag_request))
                .configure(move |cfg: &mut web::ServiceConfig| {
                    configure_app(cfg, &context, &server)
                }),
        )
        .await
    }};
}

fn error_body(message: &str) -> ErrorBody {
    ErrorBody {
        message: message.to_string(),
        code: 400,
    }
}

fn shorten_request(body: &'static str) -> TestRequest {
    TestRequest::post()
        .uri("/shorten")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body)
}

/// Store whose every call fails
struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn exists(&self, _key: &str) -> Result<bool> {
        Err(ShortledgerError::store_failure("connection refused"))
    }

    async fn get(&self, _key: &str) -> Result<StoredObject> {
        Err(ShortledgerError::store_failure("connection refused"))
    }

    async fn put(&self, _key: &str, _body: Bytes) -> Result<()> {
        Err(ShortledgerError::store_failure("connection refused"))
    }

    fn bucket(&self) -> &str {
        "broken"
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

// =============================================================================
// POST /shorten
// =============================================================================

#[actix_web::test]
async fn test_shorten_returns_record() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    let app = init_app!(context, config);

    let resp = test::call_service(
        &app,
        shorten_request(r#"{"url":"https://www.google.com"}"#).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"url": "https://www.google.com", "shorturl": "7378mDnD7g", "domain": "google"})
    );

    // 再次提交返回同一条记录
    let again: Value = test::call_and_read_body_json(
        &app,
        shorten_request(r#"{"url":"https://www.google.com"}"#).to_request(),
    )
    .await;
    assert_eq!(again, body);
    assert_eq!(context.ledger.snapshot().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_shorten_empty_inputs() {
    let config = StaticConfig::default();
    let app = init_app!(memory_context(&config), config);

    for payload in ["", "{}", r#"{"url":""}"#, r#"{"url":null}"#, "null"] {
        let resp = test::call_service(&app, shorten_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {:?}", payload);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body, error_body(EMPTY_URL_MESSAGE), "payload {:?}", payload);
    }
}

#[actix_web::test]
async fn test_shorten_malformed_json() {
    let config = StaticConfig::default();
    let app = init_app!(memory_context(&config), config);

    let resp = test::call_service(&app, shorten_request("{url").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body.code, 400);
    assert!(!body.message.is_empty());
    assert_ne!(body.message, EMPTY_URL_MESSAGE);
}

#[actix_web::test]
async fn test_shorten_invalid_url() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    let app = init_app!(context, config);

    let resp = test::call_service(
        &app,
        shorten_request(r#"{"url":"https://www.percent-off.com/_20_%+off_60000_"}"#).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body, error_body(INVALID_URL_MESSAGE));
    assert!(context.ledger.load().await.unwrap().is_none());
}

// =============================================================================
// GET /redirect
// =============================================================================

#[actix_web::test]
async fn test_redirect_after_shorten() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    context.ledger.shorten("https://www.reddit.com").await.unwrap();
    let app = init_app!(context, config);

    let req = TestRequest::get().uri("/redirect/G_D9V2TdGF").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://www.reddit.com"
    );
}

#[actix_web::test]
async fn test_redirect_unknown_code() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    context.ledger.shorten("https://www.reddit.com").await.unwrap();
    let app = init_app!(context, config);

    let req = TestRequest::get().uri("/redirect/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body, error_body(UNKNOWN_CODE_MESSAGE));
}

#[actix_web::test]
async fn test_redirect_without_code() {
    let config = StaticConfig::default();
    let app = init_app!(memory_context(&config), config);

    for uri in ["/redirect", "/redirect/"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body, error_body(EMPTY_CODE_MESSAGE), "uri {}", uri);
    }
}

// =============================================================================
// GET /metrics
// =============================================================================

#[actix_web::test]
async fn test_metrics_without_ledger() {
    let config = StaticConfig::default();
    let app = init_app!(memory_context(&config), config);

    let resp = test::call_service(&app, TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(body, error_body(NO_METRICS_MESSAGE));
}

#[actix_web::test]
async fn test_metrics_report() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    for url in [
        "https://www.google.com",
        "https://www.reddit.com",
        "https://www.google.com/abc",
        "https://facebook.com/abc",
        "https://www.facebook.com",
        "https://www.google.com/abcd",
    ] {
        context.ledger.shorten(url).await.unwrap();
    }
    let app = init_app!(context, config);

    let body: Value =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(
        body,
        json!([
            {"domain": "google", "count": 3},
            {"domain": "facebook", "count": 2},
            {"domain": "reddit", "count": 1}
        ])
    );

    let body: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get().uri("/metrics?limit=1").to_request(),
    )
    .await;
    assert_eq!(body, json!([{"domain": "google", "count": 3}]));

    // limit 0 仍然返回数组
    let resp =
        test::call_service(&app, TestRequest::get().uri("/metrics?limit=0").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, Bytes::from_static(b"[]"));
}

#[actix_web::test]
async fn test_metrics_invalid_limit() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    context.ledger.shorten("https://www.google.com").await.unwrap();
    let app = init_app!(context, config);

    for uri in ["/metrics?limit=abc", "/metrics?limit=", "/metrics?limit=1.5"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body, error_body(INVALID_LIMIT_MESSAGE), "uri {}", uri);
    }
}

// =============================================================================
// Deployment & infrastructure
// =============================================================================

#[actix_web::test]
async fn test_handler_subset() {
    let mut config = StaticConfig::default();
    config.server.handlers = vec![HANDLER_REDIRECT.to_string()];
    let app = init_app!(memory_context(&config), config);

    let resp = test::call_service(
        &app,
        shorten_request(r#"{"url":"https://www.google.com"}"#).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, TestRequest::get().uri("/metrics").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, TestRequest::get().uri("/redirect/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_health_check() {
    let config = StaticConfig::default();
    let context = memory_context(&config);
    let app = init_app!(context, config);

    let body: HealthResponse =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(body.status, "healthy");
    assert_eq!(body.backend, "memory");
    assert!(!body.ledger_exists);

    context.ledger.shorten("https://www.google.com").await.unwrap();
    let body: HealthResponse =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/health").to_request()).await;
    assert!(body.ledger_exists);
}

#[actix_web::test]
async fn test_health_check_with_broken_store() {
    let config = StaticConfig::default();
    let context = StartupContext::from_store(Arc::new(BrokenStore), &config);
    let app = init_app!(context, config);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, "unhealthy");
    assert_eq!(body.error.as_deref(), Some("connection refused"));

}

#[actix_web::test]
async fn test_store_failure_is_a_400_on_every_handler() {
    let config = StaticConfig::default();
    let context = StartupContext::from_store(Arc::new(BrokenStore), &config);
    let app = init_app!(context, config);

    let requests = [
        shorten_request(r#"{"url":"https://www.google.com"}"#).to_request(),
        TestRequest::get().uri("/redirect/7378mDnD7g").to_request(),
        TestRequest::get().uri("/metrics?limit=2").to_request(),
    ];
    for req in requests {
        let path = req.path().to_string();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body, error_body("connection refused"), "{}", path);
    }
}

#[actix_web::test]
async fn test_request_id_header() {
    let config = StaticConfig::default();
    let app = init_app!(memory_context(&config), config);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let req = TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "gateway-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "gateway-123");
}
