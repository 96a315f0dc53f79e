//! HTTP signal source against a mock pressure service.

use std::sync::Arc;
use std::time::Duration;

use pressure_gate::initialization::init_signal_client;
use pressure_gate::{
    HttpSignalSource, PressureConfig, PressureDecelerator, RequestContext, SignalSource,
    SignalSourceError, TickOutcome,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> HttpSignalSource {
    let client = init_signal_client(Duration::from_secs(2)).expect("client");
    HttpSignalSource::new(client, server.uri())
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": "0", "msg": "", "data": data}))
}

#[tokio::test]
async fn test_single_sleep_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pressure/v1/sleeptime"))
        .and(body_json(json!({"key": "orders"})))
        .respond_with(ok(json!({"sleeptime": 180})))
        .expect(1)
        .mount(&server)
        .await;

    let ms = source_for(&server)
        .sleep_time(&RequestContext::new(), "orders")
        .await
        .expect("sleep time");
    assert_eq!(ms, 180);
}

#[tokio::test]
async fn test_batch_sleep_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pressure/v1/sleeptime/batch"))
        .and(body_json(json!({"keys": ["a", "b"]})))
        .respond_with(ok(json!({"sleeptimes": {"a": 10, "b": 0}})))
        .expect(1)
        .mount(&server)
        .await;

    let keys = vec!["a".to_string(), "b".to_string()];
    let values = source_for(&server)
        .batch_sleep_time(&RequestContext::new(), &keys)
        .await
        .expect("batch");
    assert_eq!(values.len(), 2);
    assert_eq!(values["a"], 10);
    assert_eq!(values["b"], 0);
}

#[tokio::test]
async fn test_empty_batch_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let values = source_for(&server)
        .batch_sleep_time(&RequestContext::new(), &[])
        .await
        .expect("batch");
    assert!(values.is_empty());
}

#[tokio::test]
async fn test_context_headers_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pressure/v1/sleeptime"))
        .and(header("Tenant", "acme"))
        .and(header("X-Tt-Logid", "req-42"))
        .and(header("Rpc-Persist-Lane-C-Apaas-Lane", "canary"))
        .respond_with(ok(json!({"sleeptime": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = RequestContext::new()
        .with_tenant("acme")
        .with_log_id("req-42")
        .with_lane_id("canary");
    let ms = source_for(&server)
        .sleep_time(&ctx, "orders")
        .await
        .expect("sleep time");
    assert_eq!(ms, 5);
}

#[tokio::test]
async fn test_api_error_carries_code_and_log_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Tt-Logid", "20240101abc")
                .set_body_json(json!({"code": "k_op_ec_20001", "msg": "system busy", "data": null})),
        )
        .mount(&server)
        .await;

    let err = source_for(&server)
        .sleep_time(&RequestContext::new(), "orders")
        .await
        .expect_err("api error");
    match &err {
        SignalSourceError::Api { code, msg, .. } => {
            assert_eq!(code, "k_op_ec_20001");
            assert_eq!(msg, "system busy");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.log_id(), Some("20240101abc"));
}

#[tokio::test]
async fn test_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = source_for(&server)
        .sleep_time(&RequestContext::new(), "orders")
        .await
        .expect_err("status error");
    match err {
        SignalSourceError::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = source_for(&server)
        .sleep_time(&RequestContext::new(), "orders")
        .await
        .expect_err("decode error");
    assert!(matches!(err, SignalSourceError::Decode(_)));
}

#[tokio::test]
async fn test_null_data_means_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok(serde_json::Value::Null))
        .mount(&server)
        .await;

    let ms = source_for(&server)
        .sleep_time(&RequestContext::new(), "orders")
        .await
        .expect("sleep time");
    assert_eq!(ms, 0);
}

#[tokio::test]
async fn test_decelerator_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pressure/v1/sleeptime"))
        .respond_with(ok(json!({"sleeptime": 2000})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pressure/v1/sleeptime/batch"))
        .respond_with(ok(json!({"sleeptimes": {"orders": 40}})))
        .expect(1)
        .mount(&server)
        .await;

    let pd = PressureDecelerator::new(
        PressureConfig::default(),
        RequestContext::new().with_tenant("acme"),
        Arc::new(source_for(&server)),
    );

    // Clamped to the default MaxSleeptime
    assert_eq!(pd.sleep_time("orders").await, 1000);

    assert_eq!(
        pd.refresh_now().await,
        TickOutcome::Refreshed {
            updated: 1,
            evicted: 0
        }
    );
    assert_eq!(pd.sleep_time("orders").await, 40);
}

#[tokio::test]
async fn test_decelerator_survives_service_outage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let pd = PressureDecelerator::new(
        PressureConfig::default(),
        RequestContext::new(),
        Arc::new(source_for(&server)),
    );

    assert_eq!(pd.sleep_time("orders").await, 0);
    assert_eq!(pd.refresh_now().await, TickOutcome::Failed { evicted: 0 });
    assert_eq!(pd.sleep_time("orders").await, 0);
}
