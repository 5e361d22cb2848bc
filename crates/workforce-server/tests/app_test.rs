//! End-to-end wiring with the in-memory backends.

use argon2::Params;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use workforce_config::{AppConfig, CacheBackend, DatabaseBackend};
use workforce_security::PasswordHasher;
use workforce_server::Application;

fn memory_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.backend = DatabaseBackend::Memory;
    config.cache.backend = CacheBackend::Memory;
    config.observability.metrics_enabled = false;
    config
}

async fn router() -> Router {
    let hasher = PasswordHasher::with_params(Params::new(8, 1, 1, None).unwrap());
    Application::build_with(&memory_config(), None, hasher)
        .await
        .unwrap()
        .router()
}

async fn call(router: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn login(router: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        router,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_configured_users_can_create_and_read_employees() {
    let router = router().await;
    let manager = login(&router, "manager", "manager123").await;
    let employee = login(&router, "employee", "employee123").await;

    let (status, _) = call(&router, Method::GET, "/api/employees/295847284", Some(&employee), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/employees",
        Some(&manager),
        Some(json!({
            "business_entity_id": 7,
            "national_id_number": "295847284",
            "login_id": "adventure-works\\gail0",
            "job_title": "Design Engineer",
            "birth_date": "1952-09-27",
            "marital_status": "M",
            "gender": "F",
            "hire_date": "2008-01-06"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (status, body) = call(&router, Method::GET, "/api/employees/295847284", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["business_entity_id"], 7);
    assert_eq!(body["data"]["job_title"], "Design Engineer");
}

#[tokio::test]
async fn test_employee_role_cannot_create() {
    let router = router().await;
    let token = login(&router, "employee", "employee123").await;

    let (status, _) = call(&router, Method::POST, "/api/employees", Some(&token), Some(json!({
        "business_entity_id": 8,
        "national_id_number": "811994146",
        "login_id": "adventure-works\\diane1",
        "job_title": "Research and Development Engineer",
        "birth_date": "1986-06-05",
        "marital_status": "S",
        "gender": "F",
        "hire_date": "2008-12-29"
    })))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_readiness_probes_the_cache() {
    let router = router().await;
    let (status, body) = call(&router, Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.to_string().contains("cache"));
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let router = router().await;
    let (status, _) = call(&router, Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
