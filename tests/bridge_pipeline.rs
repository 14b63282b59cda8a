//! End-to-end tests of the translation pipeline against a mock downstream.

use axum::http::Method;
use serde_json::json;
use std::time::{Duration, Instant};

use rpc_bridge::bridge::{Bridge, RpcRequest};
use rpc_bridge::health::HealthProbe;

mod common;

fn bridge_for(base_url: &str) -> Bridge {
    Bridge::from_config(&common::config_for(base_url)).unwrap()
}

#[tokio::test]
async fn test_create_posts_payload_as_json_body() {
    let downstream = common::start_downstream(|_| (201, r#"{"id": 1, "name": "Ada"}"#.into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("CreateUser", json!({"name": "Ada", "age": 36})))
        .await;

    assert!(result.success, "unexpected failure: {}", result.error);
    assert_eq!(result.error, "");
    assert_eq!(result.data["id"], json!(1));
    assert_eq!(result.metadata["http_status"], "201");
    assert_eq!(result.metadata["http_method"], "POST");

    let seen = downstream.last();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/api/users");
    assert_eq!(seen.query, None);
    assert_eq!(seen.headers["content-type"], "application/json");
    assert_eq!(seen.json_body(), json!({"name": "Ada", "age": 36}));
}

#[tokio::test]
async fn test_delete_binds_path_and_sends_no_body() {
    let downstream = common::start_downstream(|_| (204, String::new())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("DeleteUser", json!({"user_id": 42})))
        .await;

    assert!(result.success);
    assert!(result.data.is_empty());

    let seen = downstream.last();
    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.path, "/api/users/42");
    assert_eq!(seen.query, None);
    assert_eq!(seen.body, "");
}

#[tokio::test]
async fn test_update_puts_payload_as_json_body() {
    let downstream = common::start_downstream(|_| (200, r#"{"updated": true}"#.into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("UpdateUser", json!({"user_id": "u-7", "name": "Grace"})))
        .await;

    assert!(result.success);
    assert_eq!(result.data["updated"], json!(true));

    let seen = downstream.last();
    assert_eq!(seen.method, Method::PUT);
    assert_eq!(seen.path, "/api/users/u-7");
    assert_eq!(seen.json_body(), json!({"user_id": "u-7", "name": "Grace"}));
}

#[tokio::test]
async fn test_other_methods_get_with_query_parameters() {
    let downstream = common::start_downstream(|_| (200, r#"[{"id": 1}]"#.into())).await;
    let bridge = bridge_for(&downstream.base_url());
    assert!(!bridge.registry().is_mapped("ListOrders"));

    let result = bridge
        .execute(&RpcRequest::new("ListOrders", json!({"status": "open", "page": 2})))
        .await;

    assert!(result.success);
    assert_eq!(result.data["value"], json!([{"id": 1}]));

    let seen = downstream.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/api/listorders");
    assert_eq!(seen.query.as_deref(), Some("page=2&status=open"));
    assert_eq!(seen.body, "");
}

#[tokio::test]
async fn test_get_with_empty_payload_has_no_query() {
    let downstream = common::start_downstream(|_| (200, "{}".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge.execute(&RpcRequest::new("Ping", serde_json::Value::Null)).await;

    assert!(result.success);
    let seen = downstream.last();
    assert_eq!(seen.path, "/api/ping");
    assert_eq!(seen.query, None);
}

#[tokio::test]
async fn test_unresolved_placeholder_is_sent_literally() {
    let downstream = common::start_downstream(|_| (404, "no such user".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("GetUser", json!({"name": "Ada"})))
        .await;

    assert!(!result.success);
    assert_eq!(result.error, "no such user");
    assert_eq!(downstream.last().path, "/api/users/%7Buser_id%7D");
}

#[tokio::test]
async fn test_path_values_stay_inside_one_segment() {
    let downstream = common::start_downstream(|_| (200, "{}".into())).await;
    let mut config = common::config_for(&downstream.base_url());
    config.routing.strip_bound_params = true;
    let bridge = Bridge::from_config(&config).unwrap();

    let result = bridge
        .execute(&RpcRequest::new("DeleteUser", json!({"user_id": "../admin/wipe"})))
        .await;
    assert!(result.success);
    let seen = downstream.last();
    assert_eq!(seen.path, "/api/users/..%2Fadmin%2Fwipe");
    assert_eq!(seen.query, None);

    let result = bridge
        .execute(&RpcRequest::new("GetUser", json!({"user_id": "7?role=admin"})))
        .await;
    assert!(result.success);
    let seen = downstream.last();
    assert_eq!(seen.path, "/api/users/7%3Frole%3Dadmin");
    assert_eq!(seen.query, None);
}

#[tokio::test]
async fn test_dot_segment_path_value_is_refused() {
    let downstream = common::start_downstream(|_| (200, "{}".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("DeleteUser", json!({"user_id": ".."})))
        .await;

    assert!(!result.success);
    assert!(result.error.starts_with("invalid payload"), "error: {}", result.error);
    assert!(downstream.requests().is_empty());
}

#[tokio::test]
async fn test_error_status_returns_raw_body() {
    let downstream = common::start_downstream(|_| (404, "not found".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("GetUser", json!({"user_id": 9})))
        .await;

    assert!(!result.success);
    assert!(result.data.is_empty());
    assert_eq!(result.error, "not found");
    assert_eq!(result.metadata["http_status"], "404");
}

#[tokio::test]
async fn test_json_error_body_is_not_reparsed() {
    let body = r#"{"detail":"email already registered"}"#;
    let downstream = common::start_downstream(move |_| (409, body.into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("CreateUser", json!({"email": "a@b.c"})))
        .await;

    assert!(!result.success);
    assert!(result.data.is_empty());
    assert_eq!(result.error, body);
}

#[tokio::test]
async fn test_empty_success_body() {
    let downstream = common::start_downstream(|_| (200, String::new())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("GetUser", json!({"user_id": 1})))
        .await;

    assert!(result.success);
    assert!(result.data.is_empty());
    assert_eq!(result.error, "");
}

#[tokio::test]
async fn test_unparsable_success_body_is_failure() {
    let downstream = common::start_downstream(|_| (200, "<html>maintenance</html>".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let result = bridge
        .execute(&RpcRequest::new("GetUser", json!({"user_id": 1})))
        .await;

    assert!(!result.success);
    assert!(result.data.is_empty());
    assert!(result.error.starts_with("failed to parse downstream response"));
}

#[tokio::test]
async fn test_connection_refused_is_failure_result() {
    let addr = common::unreachable_addr().await;
    let bridge = bridge_for(&format!("http://{}", addr));

    let result = bridge
        .execute(&RpcRequest::new("CreateUser", json!({"name": "Ada"})))
        .await;

    assert!(!result.success);
    assert!(result.data.is_empty());
    assert!(result.error.contains(&addr.to_string()), "error: {}", result.error);
    assert!(!result.metadata.contains_key("http_status"));
}

#[tokio::test]
async fn test_caller_deadline_bounds_execute() {
    let addr = common::start_hanging_downstream().await;
    let bridge = bridge_for(&format!("http://{}", addr));

    let mut request = RpcRequest::new("GetUser", json!({"user_id": 1}));
    request.timeout_ms = Some(200);

    let start = Instant::now();
    let result = bridge.execute(&request).await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(!result.success);
    assert!(result.error.contains("timed out after 200ms"), "error: {}", result.error);
}

#[tokio::test]
async fn test_caller_deadline_is_capped_by_config() {
    let addr = common::start_hanging_downstream().await;
    let mut config = common::config_for(&format!("http://{}", addr));
    config.downstream.request_timeout_secs = 1;
    config.downstream.max_request_timeout_secs = 1;
    let bridge = Bridge::from_config(&config).unwrap();

    let mut request = RpcRequest::new("GetUser", json!({"user_id": 1}));
    request.timeout_ms = Some(600_000);

    let start = Instant::now();
    let result = bridge.execute(&request).await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(!result.success);
    assert!(result.error.contains("timed out after 1000ms"), "error: {}", result.error);
}

#[tokio::test]
async fn test_compensate_replays_execute() {
    let downstream = common::start_downstream(|req| {
        (200, format!(r#"{{"method": "{}", "path": "{}"}}"#, req.method, req.path))
    })
    .await;
    let bridge = bridge_for(&downstream.base_url());
    let request = RpcRequest::new("DeleteUser", json!({"user_id": 42}));

    let executed = bridge.execute(&request).await;
    let compensated = bridge.compensate(&request).await;

    assert_eq!(executed, compensated);
    assert!(!executed.metadata.contains_key("elapsed_ms"));
    assert_eq!(compensated.data["method"], json!("DELETE"));

    let requests = downstream.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, requests[1].path);
    assert_eq!(requests[0].method, requests[1].method);
}

#[tokio::test]
async fn test_compensate_failure_matches_execute_failure() {
    let addr = common::unreachable_addr().await;
    let bridge = bridge_for(&format!("http://{}", addr));
    let request = RpcRequest::new("UpdateUser", json!({"user_id": 3}));

    let executed = bridge.execute(&request).await;
    let compensated = bridge.compensate(&request).await;

    assert!(!executed.success);
    assert_eq!(executed, compensated);
}

#[tokio::test]
async fn test_correlation_headers_are_forwarded() {
    let downstream = common::start_downstream(|_| (200, "{}".into())).await;
    let bridge = bridge_for(&downstream.base_url());

    let mut request = RpcRequest::new("GetUser", json!({"user_id": 1}));
    request.correlation_id = Some("wf-9:charge".into());
    request.workflow_id = Some("wf-9".into());
    request.step_id = Some("charge".into());
    request.headers.insert("authorization".into(), "Bearer token".into());

    let result = bridge.execute(&request).await;
    assert!(result.success);

    let seen = downstream.last();
    assert_eq!(seen.headers["x-correlation-id"], "wf-9:charge");
    assert_eq!(seen.headers["x-workflow-id"], "wf-9");
    assert_eq!(seen.headers["x-step-id"], "charge");
    assert_eq!(seen.headers["authorization"], "Bearer token");
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let downstream = common::start_downstream(|req| {
        let id = req.path.rsplit('/').next().unwrap_or_default().to_string();
        (200, format!(r#"{{"id": "{}"}}"#, id))
    })
    .await;
    let bridge = bridge_for(&downstream.base_url());

    let mut tasks = Vec::new();
    for i in 0..20 {
        let bridge = bridge.clone();
        tasks.push(tokio::spawn(async move {
            let result = bridge
                .execute(&RpcRequest::new("GetUser", json!({"user_id": i})))
                .await;
            (i, result)
        }));
    }

    for task in tasks {
        let (i, result) = task.await.unwrap();
        assert!(result.success);
        assert_eq!(result.data["id"], json!(i.to_string()));
    }
    assert_eq!(downstream.requests().len(), 20);
}

#[tokio::test]
async fn test_health_ok_on_200() {
    let downstream = common::start_downstream(|req| {
        if req.path == "/health" {
            (200, "ok".into())
        } else {
            (404, String::new())
        }
    })
    .await;
    let bridge = bridge_for(&downstream.base_url());

    let status = bridge.check_health().await;
    assert!(status.healthy);
    assert_eq!(status.message, "Service is healthy");
    assert_eq!(downstream.last().method, Method::GET);
}

#[tokio::test]
async fn test_health_non_200_is_unhealthy() {
    let downstream = common::start_downstream(|_| (204, String::new())).await;
    let bridge = bridge_for(&downstream.base_url());

    let status = bridge.check_health().await;
    assert!(!status.healthy);
    assert_eq!(status.message, "Service is not responding");
}

#[tokio::test]
async fn test_health_unreachable_is_unhealthy() {
    let addr = common::unreachable_addr().await;
    let bridge = bridge_for(&format!("http://{}", addr));

    let status = bridge.check_health().await;
    assert!(!status.healthy);
    assert_eq!(status.message, "Service is not responding");
}

#[tokio::test]
async fn test_health_probe_is_time_bounded() {
    let addr = common::start_hanging_downstream().await;
    let mut config = common::config_for(&format!("http://{}", addr));
    config.health_check.timeout_secs = 1;

    let bridge = Bridge::from_config(&config).unwrap();
    let start = Instant::now();
    let status = bridge.check_health().await;

    assert!(!status.healthy);
    assert_eq!(status.message, "Service is not responding");
    assert!(start.elapsed() >= Duration::from_millis(900));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_probe_uses_configured_path() {
    let downstream = common::start_downstream(|_| (200, String::new())).await;
    let mut config = common::config_for(&downstream.base_url());
    config.health_check.path = "/internal/live".into();

    let probe = HealthProbe::new(
        reqwest::Client::new(),
        &url::Url::parse(&config.downstream.base_url).unwrap(),
        &config.health_check,
    )
    .unwrap();
    assert_eq!(probe.timeout(), Duration::from_secs(5));
    assert_eq!(probe.url().path(), "/internal/live");

    assert!(probe.check().await.healthy);
    assert_eq!(downstream.last().path, "/internal/live");
}
