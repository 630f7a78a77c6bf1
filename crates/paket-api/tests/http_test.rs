//! HTTP surface tests for the delivery API.
//!
//! Drives the full router with in-memory workflows: delivery creation,
//! status lookup, carrier webhook ingestion, and the health probe. Each
//! test builds a fresh router over a shared test environment and asserts
//! on status codes and response bodies.

use std::{sync::Arc, time::Duration};

use axum::{body::Body, http::StatusCode, Router};
use paket_api::{create_router, AppState};
use paket_core::models::{DeliveryId, DeliveryStatus};
use paket_testing::{sample_address, sample_customer, DeliveryBuilder, TestEnv};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Builds a router over the environment's store and workflows.
fn test_app(env: &TestEnv) -> Router {
    let state = AppState::new(
        env.store_handle(),
        Arc::new(env.creator()),
        Arc::new(env.reconciler()),
    );
    create_router(state, Duration::from_secs(5))
}

fn get_request(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body_bytes).expect("response body should be valid JSON")
}

fn create_body(order_id: &str) -> Value {
    json!({
        "order_id": order_id,
        "shipping_address": serde_json::to_value(sample_address()).unwrap(),
        "customer_info": serde_json::to_value(sample_customer()).unwrap(),
    })
}

/// Health endpoint reports the service as alive with its version.
#[tokio::test]
async fn health_check_returns_ok_with_version() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let response = app.oneshot(get_request("/health")).await.expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body.get("version").is_some(), "health response should include version");
    assert!(body.get("timestamp").is_some(), "health response should include timestamp");
}

/// Creating a delivery returns 201 with the purchased label.
#[tokio::test]
async fn create_delivery_returns_created_label() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let response = app
        .oneshot(post_json("/api/deliveries", &create_body("ORDER-9001")))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["order_id"], "ORDER-9001");
    assert_eq!(body["status"], "CONFIRMED");
    let provider = body["provider"].as_str().expect("provider should be a string");
    assert!(provider == "novapost" || provider == "swiftline");
    let tracking = body["tracking_number"].as_str().expect("tracking number should be a string");
    assert!(tracking.starts_with("TRK-"), "scripted carriers issue TRK- numbers: {tracking}");
    assert_eq!(env.store.len().await, 1);
}

/// A short order id is rejected with a validation error.
#[tokio::test]
async fn create_delivery_rejects_short_order_id() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let response = app
        .oneshot(post_json("/api/deliveries", &create_body("ab")))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(env.store.is_empty().await);
}

/// A second delivery for the same order is refused with 409.
#[tokio::test]
async fn create_delivery_for_existing_order_returns_conflict() {
    let env = TestEnv::new();
    env.insert_delivery(DeliveryBuilder::with_defaults().order("ORDER-DUP-1").build()).await;
    let app = test_app(&env);

    let response = app
        .oneshot(post_json("/api/deliveries", &create_body("ORDER-DUP-1")))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_ORDER");
    assert_eq!(env.store.len().await, 1);
}

/// With every carrier offline creation answers 503.
#[tokio::test]
async fn create_delivery_without_available_carrier_returns_service_unavailable() {
    let env = TestEnv::new();
    env.pull_provider.set_available(false);
    env.push_provider.set_available(false);
    let app = test_app(&env);

    let response = app
        .oneshot(post_json("/api/deliveries", &create_body("ORDER-9002")))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "NO_PROVIDER_AVAILABLE");
    assert!(env.store.is_empty().await);
}

/// Status lookup returns the stored delivery state.
#[tokio::test]
async fn status_lookup_returns_current_state() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .id(DeliveryId::parse("507f1f77bcf86cd799439011").unwrap())
        .order("ORDER-7001")
        .tracking_number("NOVA7001")
        .status(DeliveryStatus::InTransit)
        .build();
    env.insert_delivery(delivery).await;
    let app = test_app(&env);

    let response = app
        .oneshot(get_request("/api/deliveries/507f1f77bcf86cd799439011/status"))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["delivery_id"], "507f1f77bcf86cd799439011");
    assert_eq!(body["order_id"], "ORDER-7001");
    assert_eq!(body["tracking_number"], "NOVA7001");
    assert_eq!(body["status"], "IN_TRANSIT");
    assert!(body.get("created_at").is_some());
    assert!(body.get("updated_at").is_some());
}

/// A malformed delivery id never reaches the store.
#[tokio::test]
async fn status_lookup_rejects_malformed_id() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let response = app
        .oneshot(get_request("/api/deliveries/not-a-delivery-id/status"))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

/// A well-formed but unknown id answers 404.
#[tokio::test]
async fn status_lookup_for_unknown_id_returns_not_found() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let unknown = Uuid::new_v4();
    let response = app
        .oneshot(get_request(&format!("/api/deliveries/{unknown}/status")))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "DELIVERY_NOT_FOUND");
}

/// A carrier notification with a new status is applied.
#[tokio::test]
async fn webhook_applies_reported_status() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .tracking_number("NOVA8001")
        .status(DeliveryStatus::Confirmed)
        .build();
    let delivery_id = delivery.id.clone();
    env.insert_delivery(delivery).await;
    let app = test_app(&env);

    let body = json!({"tracking_number": "NOVA8001", "status": "IN_TRANSIT"});
    let response = app
        .oneshot(post_json("/api/webhooks/delivery-status", &body))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["changed"], true);
    assert_eq!(body["status"], "IN_TRANSIT");

    let stored = env.store.get(&delivery_id).await.expect("delivery still stored");
    assert_eq!(stored.status, DeliveryStatus::InTransit);
}

/// Replaying the current status is a 200 no-op.
#[tokio::test]
async fn webhook_replay_returns_ok_without_change() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults()
        .tracking_number("NOVA8002")
        .status(DeliveryStatus::InTransit)
        .build();
    env.insert_delivery(delivery).await;
    let app = test_app(&env);

    let body = json!({"tracking_number": "NOVA8002", "status": "IN_TRANSIT"});
    let response = app
        .oneshot(post_json("/api/webhooks/delivery-status", &body))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["changed"], false);
    assert_eq!(body["status"], "IN_TRANSIT");
}

/// An unknown tracking number answers 404.
#[tokio::test]
async fn webhook_for_unknown_tracking_number_returns_not_found() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let body = json!({"tracking_number": "NOVA0000", "status": "DELIVERED"});
    let response = app
        .oneshot(post_json("/api/webhooks/delivery-status", &body))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "DELIVERY_NOT_FOUND");
}

/// A status outside the known set answers 422 and echoes the value.
#[tokio::test]
async fn webhook_with_unknown_status_returns_unprocessable() {
    let env = TestEnv::new();
    let delivery = DeliveryBuilder::with_defaults().tracking_number("NOVA8003").build();
    env.insert_delivery(delivery).await;
    let app = test_app(&env);

    let body = json!({"tracking_number": "NOVA8003", "status": "SHIPPED"});
    let response = app
        .oneshot(post_json("/api/webhooks/delivery-status", &body))
        .await
        .expect("failed to make request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_STATUS");
    let message = body["error"]["message"].as_str().expect("message should be a string");
    assert!(message.contains("SHIPPED"), "message should echo the raw status: {message}");
}

/// Every response carries a request id for cross-service tracing.
#[tokio::test]
async fn responses_carry_request_id_header() {
    let env = TestEnv::new();
    let app = test_app(&env);

    let response = app.oneshot(get_request("/health")).await.expect("failed to make request");

    let header = response
        .headers()
        .get("X-Request-Id")
        .expect("X-Request-Id header should be present")
        .to_str()
        .expect("header should be valid UTF-8");
    Uuid::parse_str(header).expect("request id should be a UUID");
}
